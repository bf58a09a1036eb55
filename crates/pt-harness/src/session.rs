//! Session driver: runs the prober `N` times and scores each run.
//!
//! Each repetition is an independent trial. The ground truth is fixed for
//! the whole session and only the report carries state between runs.

use std::time::Instant;

use pt_lattice::{AdjacencyMap, RunOutcome, SessionReport, compare, parse_lattice};
use tracing::{debug, info, warn};

use crate::error::HarnessError;
use crate::prober::{ProbeResult, Prober};

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub bound_args: String,
    pub destination: String,
    pub repetitions: u64,
}

/// Progress after one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// One-based number of the run just finished.
    pub run: u64,
    pub total: u64,
    pub dropped: u64,
    pub outcome: RunOutcome,
}

/// Run every repetition of `plan` against `actual`.
///
/// A run whose output has no parsable lattice aborts the session.
pub fn run_session<P, F>(
    plan: &SessionPlan,
    actual: &AdjacencyMap,
    prober: &mut P,
    mut on_progress: F,
) -> Result<SessionReport, HarnessError>
where
    P: Prober,
    F: FnMut(&Progress),
{
    let mut report = SessionReport::new(
        plan.bound_args.as_str(),
        plan.destination.as_str(),
        plan.repetitions,
        actual,
    );
    info!(
        bound_args = %plan.bound_args,
        destination = %plan.destination,
        repetitions = plan.repetitions,
        branch_points = report.branches.len(),
        "starting session"
    );

    let started = Instant::now();
    for run in 1..=plan.repetitions {
        let outcome = match prober.probe(&plan.bound_args, &plan.destination)? {
            ProbeResult::Dropped => {
                debug!(run, "run dropped");
                report.record_dropped()
            }
            ProbeResult::Completed { exit_code, output } => {
                let discovered = parse_lattice(&output, &plan.destination)
                    .map_err(|source| HarnessError::Lattice { run, source })?;
                let diff = compare(&discovered, actual);
                debug!(
                    run,
                    ?exit_code,
                    edges = discovered.edge_count(),
                    missing = diff.missing.len(),
                    spurious = diff.spurious.len(),
                    "run scored"
                );
                if let Some(first) = diff.iter().next() {
                    warn!(run, differences = diff.len(), "lattice mismatch, first: {}", first);
                }
                report.record_completed(&discovered, diff)
            }
        };

        on_progress(&Progress {
            run,
            total: plan.repetitions,
            dropped: report.dropped,
            outcome,
        });
    }
    report.elapsed = started.elapsed();

    info!(
        runs = report.runs,
        failures = report.failures,
        dropped = report.dropped,
        "session finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_lattice::LatticeError;
    use std::collections::VecDeque;

    const DIAMOND: &str = "Lattice:\nNone, A, B\nA, 10.0.9.9\nB, 10.0.9.9\n";
    const HALF: &str = "Lattice:\nNone, A\nA, 10.0.9.9\n";

    struct ScriptedProber {
        results: VecDeque<ProbeResult>,
        calls: Vec<(String, String)>,
    }

    impl ScriptedProber {
        fn new(outputs: &[Option<&str>]) -> Self {
            let results = outputs
                .iter()
                .map(|output| match output {
                    Some(text) => ProbeResult::Completed {
                        exit_code: Some(0),
                        output: text.to_string(),
                    },
                    None => ProbeResult::Dropped,
                })
                .collect();
            Self {
                results,
                calls: Vec::new(),
            }
        }
    }

    impl Prober for ScriptedProber {
        fn probe(&mut self, bound_args: &str, destination: &str) -> Result<ProbeResult, HarnessError> {
            self.calls.push((bound_args.to_string(), destination.to_string()));
            Ok(self.results.pop_front().expect("more runs than scripted"))
        }
    }

    fn actual() -> AdjacencyMap {
        [("start", "A"), ("start", "B"), ("A", "end"), ("B", "end")]
            .into_iter()
            .collect()
    }

    fn plan(repetitions: u64) -> SessionPlan {
        SessionPlan {
            bound_args: "95,2,4".into(),
            destination: "10.0.9.9".into(),
            repetitions,
        }
    }

    #[test]
    fn test_mixed_session() {
        let mut prober = ScriptedProber::new(&[Some(DIAMOND), None, Some(HALF), Some(DIAMOND)]);
        let mut seen = Vec::new();

        let report = run_session(&plan(4), &actual(), &mut prober, |p| seen.push(*p)).unwrap();

        assert_eq!(report.runs, 4);
        assert_eq!(report.passes, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.failure_rate(), Some(1.0 / 3.0));
        assert_eq!(report.branches["start"].counts, vec![0, 1, 2]);

        let outcomes: Vec<_> = seen.iter().map(|p| p.outcome).collect();
        assert_eq!(
            outcomes,
            vec![RunOutcome::Pass, RunOutcome::Dropped, RunOutcome::Fail, RunOutcome::Pass]
        );
        assert_eq!(seen[3].run, 4);
        assert_eq!(seen[3].dropped, 1);
        assert!(prober
            .calls
            .iter()
            .all(|(bound, dest)| bound == "95,2,4" && dest == "10.0.9.9"));
    }

    #[test]
    fn test_dropped_runs_leave_denominator() {
        let mut prober = ScriptedProber::new(&[None, None, Some(HALF)]);
        let report = run_session(&plan(3), &actual(), &mut prober, |_| {}).unwrap();

        assert_eq!(report.evaluated(), 1);
        assert_eq!(report.failure_rate(), Some(1.0));
        assert_eq!(report.branches["start"].total(), 1);
    }

    #[test]
    fn test_missing_marker_aborts_with_run_number() {
        let mut prober = ScriptedProber::new(&[Some(DIAMOND), Some("segfault\n")]);
        let err = run_session(&plan(5), &actual(), &mut prober, |_| {}).unwrap_err();

        match err {
            HarnessError::Lattice { run, source } => {
                assert_eq!(run, 2);
                assert_eq!(source, LatticeError::MarkerNotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(prober.calls.len(), 2);
    }

    #[test]
    fn test_zero_repetitions() {
        let mut prober = ScriptedProber::new(&[]);
        let report = run_session(&plan(0), &actual(), &mut prober, |_| {}).unwrap();
        assert_eq!(report.runs, 0);
        assert_eq!(report.failure_rate(), None);
    }
}

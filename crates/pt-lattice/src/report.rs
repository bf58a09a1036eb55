//! Session reporting: aggregates run outcomes into human-readable and
//! machine-readable reports.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::diff::{RunOutcome, TopologyDiff};
use crate::tally::{BranchTally, branch_tallies, record_run};
use crate::topology::AdjacencyMap;

/// Failing runs whose diffs are kept and printed in the summary.
const SHOWN_FAILURES: usize = 10;

const RULE: &str = "------------------------------------------------------";

/// Summary of a failure-test session against one destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Bound configuration handed to the prober (e.g. "95,2,4").
    pub bound_args: String,
    pub destination: String,
    /// Repetitions requested.
    pub requested_runs: u64,
    /// Repetitions executed so far, dropped ones included.
    pub runs: u64,
    pub passes: u64,
    pub failures: u64,
    pub dropped: u64,
    pub elapsed: Duration,
    /// Discovery tallies keyed by branch point label.
    pub branches: BTreeMap<String, BranchTally>,
    /// Diffs of the first failing runs, at most ten. `failures` keeps the
    /// full count.
    pub failed_runs: Vec<FailedRun>,
}

/// Diff for a single failing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRun {
    /// Zero-based repetition index.
    pub run: u64,
    pub diff: TopologyDiff,
}

impl SessionReport {
    /// Create an empty report with one tally per branch point of `actual`.
    pub fn new(
        bound_args: impl Into<String>,
        destination: impl Into<String>,
        requested_runs: u64,
        actual: &AdjacencyMap,
    ) -> Self {
        Self {
            bound_args: bound_args.into(),
            destination: destination.into(),
            requested_runs,
            runs: 0,
            passes: 0,
            failures: 0,
            dropped: 0,
            elapsed: Duration::ZERO,
            branches: branch_tallies(actual),
            failed_runs: Vec::new(),
        }
    }

    /// Record a dropped run. It takes no part in pass/fail statistics.
    pub fn record_dropped(&mut self) -> RunOutcome {
        self.runs += 1;
        self.dropped += 1;
        RunOutcome::Dropped
    }

    /// Record a completed run from its discovered lattice and its diff
    /// against the ground truth.
    pub fn record_completed(&mut self, discovered: &AdjacencyMap, diff: TopologyDiff) -> RunOutcome {
        let run = self.runs;
        self.runs += 1;
        record_run(&mut self.branches, discovered);

        let outcome = diff.outcome();
        match outcome {
            RunOutcome::Pass => self.passes += 1,
            _ => {
                self.failures += 1;
                if self.failed_runs.len() < SHOWN_FAILURES {
                    self.failed_runs.push(FailedRun { run, diff });
                }
            }
        }
        outcome
    }

    /// Runs that count towards pass/fail statistics.
    pub fn evaluated(&self) -> u64 {
        self.runs - self.dropped
    }

    /// `failures / (runs - dropped)`, or `None` if every run was dropped.
    pub fn failure_rate(&self) -> Option<f64> {
        let evaluated = self.evaluated();
        (evaluated > 0).then(|| self.failures as f64 / evaluated as f64)
    }

    /// True if at least one run was evaluated and none failed.
    pub fn passed(&self) -> bool {
        self.evaluated() > 0 && self.failures == 0
    }

    /// Write the end-of-session summary and branch discovery dump.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let evaluated = self.evaluated();
        let minutes = self.elapsed.as_secs() / 60;
        let seconds = self.elapsed.as_secs() % 60;

        writeln!(out, "Tests dropped: {}", self.dropped)?;
        writeln!(out, "Duration: {} minutes {} seconds", minutes, seconds)?;
        writeln!(out)?;
        writeln!(out, "{} failures out of {} runs", self.failures, evaluated)?;
        match self.failure_rate() {
            Some(rate) => writeln!(out, "Failure rate: {:.4}", rate)?,
            None => writeln!(out, "Failure rate: n/a")?,
        }

        let show = self.failed_runs.len().min(SHOWN_FAILURES);
        if show > 0 {
            writeln!(out)?;
            writeln!(out, "First {} failing runs:", show)?;
            for failed in &self.failed_runs[..show] {
                writeln!(out, "  Run {}:", failed.run + 1)?;
                for edge in failed.diff.iter() {
                    writeln!(out, "    {}", edge)?;
                }
            }
            let hidden = self.failures.saturating_sub(show as u64);
            if hidden > 0 {
                writeln!(out, "  ... and {} more failing runs", hidden)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, " Branch discovery rate dump")?;
        writeln!(out, "{}", RULE)?;
        for (index, (branch, tally)) in self.branches.iter().enumerate() {
            let expected = tally.expected_children();
            writeln!(out, "At branching point {}: {}", index + 1, branch)?;
            for k in 1..=expected {
                writeln!(
                    out,
                    "Discovered {} out of {} children {} / {} times: {}",
                    k,
                    expected,
                    tally.counts[k],
                    evaluated,
                    format_fraction(tally.counts[k], evaluated)
                )?;
            }
            if tally.counts[0] > 0 {
                writeln!(
                    out,
                    "Missed entirely {} / {} times: {}",
                    tally.counts[0],
                    evaluated,
                    format_fraction(tally.counts[0], evaluated)
                )?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
        writeln!(out, "/end test data")?;
        Ok(())
    }

    /// Print the summary to stdout.
    pub fn print_summary(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_summary(&mut lock)
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn format_fraction(count: u64, total: u64) -> String {
    if total == 0 {
        "n/a".to_string()
    } else {
        format!("{:.4}", count as f64 / total as f64)
    }
}

//! Per-branch discovery tallies.
//!
//! For every branch point of the ground truth, counts how many runs
//! discovered exactly `k` of its children.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::topology::AdjacencyMap;

/// Discovery counts for one branch point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTally {
    /// Children of the branch point in the ground truth.
    pub expected: BTreeSet<String>,
    /// `counts[k]` is the number of runs that discovered `k` expected
    /// children. Length is `expected.len() + 1`.
    pub counts: Vec<u64>,
}

impl BranchTally {
    pub fn new(expected: BTreeSet<String>) -> Self {
        let counts = vec![0; expected.len() + 1];
        Self { expected, counts }
    }

    pub fn expected_children(&self) -> usize {
        self.expected.len()
    }

    /// Record one run in which `discovered` children were seen under this
    /// branch point, or `None` if the branch point was never reached.
    ///
    /// Only children that are part of the ground truth count.
    pub fn record(&mut self, discovered: Option<&BTreeSet<String>>) -> usize {
        let k = discovered
            .map(|children| children.intersection(&self.expected).count())
            .unwrap_or(0);
        self.counts[k] += 1;
        k
    }

    /// Runs recorded so far.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Fraction of recorded runs that discovered exactly `k` children.
    pub fn frequency(&self, k: usize) -> Option<f64> {
        let total = self.total();
        let count = *self.counts.get(k)?;
        (total > 0).then(|| count as f64 / total as f64)
    }
}

/// Build empty tallies for every branch point of `actual`.
pub fn branch_tallies(actual: &AdjacencyMap) -> BTreeMap<String, BranchTally> {
    actual
        .branch_points()
        .map(|(label, children)| (label.to_string(), BranchTally::new(children.clone())))
        .collect()
}

/// Record one completed run against every tally.
pub fn record_run(tallies: &mut BTreeMap<String, BranchTally>, discovered: &AdjacencyMap) {
    for (branch, tally) in tallies.iter_mut() {
        tally.record(discovered.children(branch));
    }
}

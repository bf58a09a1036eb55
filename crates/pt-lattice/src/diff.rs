//! Discovered-vs-actual topology diffing.
//!
//! Compares the lattice a run discovered against the ground truth,
//! producing the edges each side has that the other lacks.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::topology::AdjacencyMap;

/// Result of a single repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Pass,
    Fail,
    /// The prober exited with the reserved dropped code.
    Dropped,
}

/// Which side of the comparison an edge is missing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeDiffKind {
    /// In the ground truth, not discovered.
    Missing,
    /// Discovered, not in the ground truth.
    Spurious,
}

impl core::fmt::Display for EdgeDiffKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EdgeDiffKind::Missing => write!(f, "MISSING"),
            EdgeDiffKind::Spurious => write!(f, "SPURIOUS"),
        }
    }
}

/// A single edge present on only one side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeDiff {
    pub kind: EdgeDiffKind,
    pub parent: String,
    pub child: String,
}

impl core::fmt::Display for EdgeDiff {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {} -> {}", self.kind, self.parent, self.child)
    }
}

/// All differences between a discovered lattice and the ground truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyDiff {
    pub missing: Vec<EdgeDiff>,
    pub spurious: Vec<EdgeDiff>,
}

impl TopologyDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.spurious.is_empty()
    }

    pub fn len(&self) -> usize {
        self.missing.len() + self.spurious.len()
    }

    /// Outcome of the run this diff was computed for.
    pub fn outcome(&self) -> RunOutcome {
        if self.is_empty() {
            RunOutcome::Pass
        } else {
            RunOutcome::Fail
        }
    }

    /// Missing edges first, then spurious ones.
    pub fn iter(&self) -> impl Iterator<Item = &EdgeDiff> {
        self.missing.iter().chain(self.spurious.iter())
    }
}

/// Compare a discovered lattice against the ground truth.
///
/// The diff is empty exactly when the two maps are equal.
pub fn compare(discovered: &AdjacencyMap, actual: &AdjacencyMap) -> TopologyDiff {
    TopologyDiff {
        missing: one_sided(actual, discovered, EdgeDiffKind::Missing),
        spurious: one_sided(discovered, actual, EdgeDiffKind::Spurious),
    }
}

/// Edges of `from` that `other` lacks, tagged with `kind`.
fn one_sided(from: &AdjacencyMap, other: &AdjacencyMap, kind: EdgeDiffKind) -> Vec<EdgeDiff> {
    from.edges()
        .filter(|(parent, child)| !other.contains_edge(parent, child))
        .map(|(parent, child)| EdgeDiff {
            kind,
            parent: parent.to_string(),
            child: child.to_string(),
        })
        .collect()
}

//! Lattice parsing and topology comparison for MDA traceroute runs.
//!
//! Turns the `Lattice:` block printed by `paris-traceroute -a mda` into an
//! interface adjacency map, loads the ground-truth topology of a simulated
//! target, diffs the two and aggregates per-run outcomes into a report.

pub mod diff;
pub mod error;
pub mod ground_truth;
pub mod lattice;
pub mod report;
pub mod tally;
pub mod topology;

// Re-export commonly used items
pub use diff::{RunOutcome, TopologyDiff, compare};
pub use error::{GroundTruthError, LatticeError};
pub use ground_truth::{GroundTruthSource, parse_ground_truth};
pub use lattice::{LATTICE_MARKER, parse_lattice};
pub use report::SessionReport;
pub use tally::BranchTally;
pub use topology::{AdjacencyMap, END_LABEL, START_LABEL};

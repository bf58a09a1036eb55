//! Failure-test harness for MDA traceroute
//!
//! Runs `paris-traceroute -a mda` (directly or through a launcher script
//! driving a simulated network) a number of times against one destination,
//! scores every run's lattice against the destination's ground-truth
//! topology and aggregates the results.

pub mod config;
pub mod error;
pub mod logging;
pub mod prober;
pub mod session;

// Re-export commonly used items
pub use config::{HarnessConfig, ProbeMode};
pub use error::HarnessError;
pub use prober::{ProbeResult, Prober, SubprocessProber};
pub use session::{Progress, SessionPlan, run_session};

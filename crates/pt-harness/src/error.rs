use std::path::PathBuf;

use pt_lattice::LatticeError;
use thiserror::Error;

/// Harness errors
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("failed to launch {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read prober output {}: {source}", path.display())]
    OutputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run {run}: {source}")]
    Lattice {
        /// One-based repetition number.
        run: u64,
        #[source]
        source: LatticeError,
    },
}

//! Error kinds for lattice and ground-truth parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the prober's lattice output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    #[error("no `Lattice:` marker found in prober output")]
    MarkerNotFound,

    #[error("malformed lattice record at line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },
}

/// Errors raised while locating or reading a ground-truth topology.
#[derive(Debug, Error)]
pub enum GroundTruthError {
    #[error("no ground-truth file for destination {destination} in {}", dir.display())]
    GroundTruthFileMissing { destination: String, dir: PathBuf },

    #[error("ambiguous ground truth for destination {destination}: {candidates:?}")]
    AmbiguousGroundTruth {
        destination: String,
        candidates: Vec<PathBuf>,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Ground-truth topologies.
//!
//! A target file describes the simulated network behind a destination: one
//! header line, then one `<parent> <child>` pair per line.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GroundTruthError;
use crate::topology::AdjacencyMap;

/// Parse the body of a target file.
///
/// The first line is a header. Lines with fewer than two tokens are skipped
/// and tokens past the second are ignored.
pub fn parse_ground_truth(text: &str) -> AdjacencyMap {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            Some((tokens.next()?, tokens.next()?))
        })
        .collect()
}

/// Where the ground truth for a destination comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundTruthSource {
    /// A specific target file.
    File(PathBuf),
    /// A directory holding one target file per destination, each named with
    /// the destination address as prefix.
    Directory(PathBuf),
}

impl GroundTruthSource {
    /// Resolve the target file for `destination`.
    ///
    /// Directory lookup refuses to guess when several files share the prefix.
    pub fn resolve(&self, destination: &str) -> Result<PathBuf, GroundTruthError> {
        match self {
            GroundTruthSource::File(path) => Ok(path.clone()),
            GroundTruthSource::Directory(dir) => find_target_file(dir, destination),
        }
    }

    /// Resolve and parse the ground truth for `destination`.
    pub fn load(&self, destination: &str) -> Result<(PathBuf, AdjacencyMap), GroundTruthError> {
        let path = self.resolve(destination)?;
        let text = fs::read_to_string(&path).map_err(|source| GroundTruthError::Io {
            path: path.clone(),
            source,
        })?;
        Ok((path, parse_ground_truth(&text)))
    }
}

fn find_target_file(dir: &Path, destination: &str) -> Result<PathBuf, GroundTruthError> {
    let io_err = |source: std::io::Error| GroundTruthError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let matches = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with(destination));
        if matches && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();

    match candidates.len() {
        0 => Err(GroundTruthError::GroundTruthFileMissing {
            destination: destination.to_string(),
            dir: dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(GroundTruthError::AmbiguousGroundTruth {
            destination: destination.to_string(),
            candidates,
        }),
    }
}

//! Harness configuration.
//!
//! Every field has a default matching the fakeroute test bed layout, so a
//! TOML file only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};

use pt_lattice::GroundTruthSource;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// How the prober is started.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// `<launcher> <bound_args> <destination>`; the launcher writes the
    /// output file and signals dropped runs through its exit code.
    #[default]
    Launcher,
    /// `<binary> -a mda -n -B <bound_args> <destination>` with stdout
    /// redirected into the output file.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub mode: ProbeMode,
    pub launcher: PathBuf,
    pub binary: PathBuf,
    /// Shared output file, rewritten on every run.
    pub output: PathBuf,
    /// Directory of target files, one per destination.
    pub targets_dir: PathBuf,
    /// Explicit target file; takes precedence over `targets_dir`.
    pub topology: Option<PathBuf>,
    pub dropped_exit_code: i32,
    pub log_level: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            mode: ProbeMode::Launcher,
            launcher: PathBuf::from("./launch_fkrt_pt.sh"),
            binary: PathBuf::from("./paris-traceroute/paris-traceroute"),
            output: PathBuf::from("output.txt"),
            targets_dir: PathBuf::from("../../paris-traceroute.fakeroute/fakeroute/targets/"),
            topology: None,
            dropped_exit_code: 23,
            log_level: "info".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Program started for each run.
    pub fn program(&self) -> &Path {
        match self.mode {
            ProbeMode::Launcher => &self.launcher,
            ProbeMode::Direct => &self.binary,
        }
    }

    pub fn ground_truth_source(&self) -> GroundTruthSource {
        match &self.topology {
            Some(path) => GroundTruthSource::File(path.clone()),
            None => GroundTruthSource::Directory(self.targets_dir.clone()),
        }
    }
}

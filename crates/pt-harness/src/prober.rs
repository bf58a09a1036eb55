//! Prober invocation.
//!
//! One blocking subprocess per run. The report lands in a single shared
//! output file, so runs must never overlap.

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, trace};

use crate::config::{HarnessConfig, ProbeMode};
use crate::error::HarnessError;

/// What a single prober run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The prober exited with the dropped code; its output is not read.
    Dropped,
    Completed {
        /// `None` if the process was killed by a signal.
        exit_code: Option<i32>,
        output: String,
    },
}

/// Something that can run the prober once.
pub trait Prober {
    fn probe(&mut self, bound_args: &str, destination: &str) -> Result<ProbeResult, HarnessError>;
}

/// Runs the configured launcher or binary as a child process.
#[derive(Debug, Clone)]
pub struct SubprocessProber {
    mode: ProbeMode,
    program: PathBuf,
    output: PathBuf,
    dropped_exit_code: i32,
}

impl SubprocessProber {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            mode: config.mode,
            program: config.program().to_path_buf(),
            output: config.output.clone(),
            dropped_exit_code: config.dropped_exit_code,
        }
    }

    fn command(&self, bound_args: &str, destination: &str) -> Result<Command, HarnessError> {
        let mut cmd = Command::new(&self.program);
        match self.mode {
            ProbeMode::Launcher => {
                // The launcher may exit without writing a report; never score
                // the previous run's file again.
                match fs::remove_file(&self.output) {
                    Ok(()) => {}
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(source) => {
                        return Err(HarnessError::OutputUnreadable {
                            path: self.output.clone(),
                            source,
                        });
                    }
                }
                cmd.args([bound_args, destination]).stdout(Stdio::null());
            }
            ProbeMode::Direct => {
                let out = File::create(&self.output).map_err(|source| {
                    HarnessError::OutputUnreadable {
                        path: self.output.clone(),
                        source,
                    }
                })?;
                cmd.args(["-a", "mda", "-n", "-B", bound_args, destination])
                    .stdout(out);
            }
        }
        cmd.stdin(Stdio::null()).stderr(Stdio::inherit());
        Ok(cmd)
    }

    fn wait(&self, mut cmd: Command) -> Result<ExitStatus, HarnessError> {
        cmd.status().map_err(|source| HarnessError::Spawn {
            program: self.program.clone(),
            source,
        })
    }
}

impl Prober for SubprocessProber {
    fn probe(&mut self, bound_args: &str, destination: &str) -> Result<ProbeResult, HarnessError> {
        let cmd = self.command(bound_args, destination)?;
        debug!(program = %self.program.display(), mode = ?self.mode, "launching prober");

        let status = self.wait(cmd)?;
        let exit_code = status.code();
        trace!(?exit_code, "prober exited");

        if exit_code == Some(self.dropped_exit_code) {
            return Ok(ProbeResult::Dropped);
        }

        let bytes = fs::read(&self.output).map_err(|source| HarnessError::OutputUnreadable {
            path: self.output.clone(),
            source,
        })?;
        Ok(ProbeResult::Completed {
            exit_code,
            output: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

//! MDA failure test
//!
//! Runs the prober repeatedly against one destination and reports how often
//! the discovered lattice differs from the ground-truth topology.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use pt_harness::logging::{init_logging, level_for_verbosity};
use pt_harness::{HarnessConfig, ProbeMode, Progress, SessionPlan, SubprocessProber, run_session};

/// Execute MDA with bound calculation repeatedly and score the lattices
#[derive(Parser, Debug)]
#[command(name = "failure-test")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bound configuration: <confidence,max branching,max children>
    bound_args: String,

    /// Destination address
    destination: String,

    /// Number of repetitions
    repetitions: u64,

    /// TOML configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// How the prober is started
    #[arg(long = "mode", value_enum)]
    mode: Option<ProbeMode>,

    /// Launcher script (launcher mode)
    #[arg(long = "launcher")]
    launcher: Option<PathBuf>,

    /// paris-traceroute binary (direct mode)
    #[arg(long = "binary")]
    binary: Option<PathBuf>,

    /// Output file the prober report is written to
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Directory of target topology files
    #[arg(long = "targets")]
    targets: Option<PathBuf>,

    /// Target topology file (overrides --targets)
    #[arg(short = 't', long = "topology")]
    topology: Option<PathBuf>,

    /// Exit code marking a dropped run
    #[arg(long = "dropped-exit-code")]
    dropped_exit_code: Option<i32>,

    /// Also write the report as JSON
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// No per-run progress line
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Verbose logging (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = build_config(&args)?;
    init_logging(level_for_verbosity(&config.log_level, args.verbose));

    let source = config.ground_truth_source();
    let (target, actual) = source
        .load(&args.destination)
        .with_context(|| format!("loading ground truth for {}", args.destination))?;
    info!(
        file = %target.display(),
        edges = actual.edge_count(),
        "ground truth loaded"
    );

    let plan = SessionPlan {
        bound_args: args.bound_args.clone(),
        destination: args.destination.clone(),
        repetitions: args.repetitions,
    };
    let mut prober = SubprocessProber::new(&config);

    println!("Please wait, executing {} runs of program\n", plan.repetitions);
    let mut show_progress = !args.quiet;
    let report = run_session(&plan, &actual, &mut prober, |progress| {
        if show_progress {
            if let Err(err) = print_progress(progress) {
                warn!(%err, "cannot write progress line, hiding it");
                show_progress = false;
            }
        }
    })?;
    println!();

    report.print_summary()?;

    if let Some(path) = &args.json {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
    }

    Ok(())
}

/// Defaults, then the config file, then command-line overrides.
fn build_config(args: &Args) -> Result<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };

    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(launcher) = &args.launcher {
        config.launcher = launcher.clone();
    }
    if let Some(binary) = &args.binary {
        config.binary = binary.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(targets) = &args.targets {
        config.targets_dir = targets.clone();
    }
    if let Some(topology) = &args.topology {
        config.topology = Some(topology.clone());
    }
    if let Some(code) = args.dropped_exit_code {
        config.dropped_exit_code = code;
    }

    Ok(config)
}

fn print_progress(progress: &Progress) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(
        stdout,
        "\rProcessing... {} / {} runs ---> total of {} dropped",
        progress.run, progress.total, progress.dropped
    )?;
    stdout.flush()
}

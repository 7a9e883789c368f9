use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use rusty_sieve::{run_with, Projection, ReadOptions, RunOptions, ThresholdPolicy, WriteOutcome};

/// Keep the rows of a CSV, JSON or Excel file whose `value` exceeds a
/// threshold, and write them to another (possibly different) format.
///
/// The config file (YAML or JSON) names `input`, `output` and an optional
/// integer `threshold` (default 10).
#[derive(Parser, Debug)]
#[command(name = "rusty-sieve", version, about, long_about = None)]
struct Cli {
    /// Run configuration (.yaml, .yml or .json)
    #[arg(short = 'c', long)]
    config: PathBuf,

    /// Read and filter, but do not write the output file
    #[arg(long)]
    dry_run: bool,

    /// How to treat a threshold that is not an integer
    #[arg(long, value_enum, default_value_t = PolicyArg::Strict)]
    threshold_policy: PolicyArg,

    /// Shape of the written records
    #[arg(long, value_enum, default_value_t = ProjectionArg::Passthrough)]
    projection: ProjectionArg,

    /// Keep native numeric types for spreadsheet cells instead of reading them as text
    #[arg(long)]
    typed_cells: bool,

    /// Log level (overrides RUST_LOG)
    #[arg(short = 'l', long, value_enum)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Reject a non-integer threshold
    Strict,
    /// Coerce it, or fall back to the default with a warning
    Lenient,
}

impl From<PolicyArg> for ThresholdPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => ThresholdPolicy::Strict,
            PolicyArg::Lenient => ThresholdPolicy::Lenient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProjectionArg {
    /// Write matching records unchanged
    Passthrough,
    /// Write only `id` and the parsed integer `value`
    Normalized,
}

impl From<ProjectionArg> for Projection {
    fn from(arg: ProjectionArg) -> Self {
        match arg {
            ProjectionArg::Passthrough => Projection::Passthrough,
            ProjectionArg::Normalized => Projection::Normalized,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
            threshold_policy: self.threshold_policy.into(),
            projection: self.projection.into(),
            read: ReadOptions {
                spreadsheet_as_text: !self.typed_cells,
            },
        }
    }
}

fn init_logging(level: Option<LogLevel>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level.into());
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let options = cli.run_options();

    let summary = run_with(&cli.config, &options)
        .with_context(|| format!("run failed for config {}", cli.config.display()))?;

    // Logs may be filtered out; the dry-run notice must always reach the operator.
    if let WriteOutcome::DryRun { path, records } = &summary.outcome {
        eprintln!(
            "Dry run: {records} of {} records would be written to {}",
            summary.records_read,
            path.display()
        );
    }

    Ok(())
}

//! CLI command definitions and argument parsing.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stratum - tiered backup placement and retention.
#[derive(Debug, Parser)]
#[command(name = "stratum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "STRATUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the configuration and list projects
    Check,

    /// Show which horizons would take an artifact today
    Plan(PlanArgs),

    /// Rotate an externally produced artifact into a project
    Rotate(RotateArgs),

    /// Enforce keep-counts without adding anything
    Purge(PurgeArgs),
}

/// Arguments for the plan command.
#[derive(Debug, Parser)]
pub struct PlanArgs {
    /// Only plan this project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Evaluate as of this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for the rotate command.
#[derive(Debug, Parser)]
pub struct RotateArgs {
    /// Project the artifact belongs to
    #[arg(short, long)]
    pub project: String,

    /// Artifact file, named <project>_<YYYY-MM-DD>.<extension>
    #[arg(long)]
    pub file: PathBuf,

    /// Rotate as of this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for the purge command.
#[derive(Debug, Parser)]
pub struct PurgeArgs {
    /// Only purge this project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Report what would be removed without touching anything
    #[arg(long)]
    pub dry_run: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

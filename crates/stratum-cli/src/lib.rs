//! Stratum CLI library.
//!
//! Command parsing, configuration lookup, command execution and output
//! formatting for the `stratum` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::OutputFormat;
pub use error::{CliError, Result};
pub use output::Formatter;

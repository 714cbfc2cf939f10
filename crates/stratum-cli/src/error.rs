//! Error types for the CLI application.

use stratum_retention::{ConfigError, RetentionError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be located
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file failed to load or validate
    #[error(transparent)]
    ConfigLoad(#[from] ConfigError),

    /// Engine error
    #[error(transparent)]
    Retention(#[from] RetentionError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some projects failed while others went through
    #[error("{failed} of {total} project(s) failed")]
    ProjectsFailed {
        /// Projects that failed
        failed: usize,
        /// Projects attempted
        total: usize,
    },
}

//! Configuration lookup for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stratum_retention::RetentionConfig;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Default configuration file location: `~/.stratum/config.toml`.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".stratum").join("config.toml"))
}

/// Pick the configuration file: explicit path (flag or `STRATUM_CONFIG`) first,
/// then the default location.
pub fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => default_path(),
    }
}

/// Load and validate the retention configuration.
pub fn load(path: &Path) -> Result<RetentionConfig> {
    if !path.exists() {
        return Err(CliError::Config(format!(
            "No configuration at {} (use --config or STRATUM_CONFIG)",
            path.display()
        )));
    }
    tracing::debug!("Loading configuration from {}", path.display());
    Ok(RetentionConfig::from_file(path)?)
}

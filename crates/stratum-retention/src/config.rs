//! Configuration for retention runs
//!
//! Loaded from TOML. Defines the backup root, the weekly rotation day and the
//! keep-counts of every project.

use chrono::Weekday;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use stratum_domain::{ArtifactName, KeepCounts};
use thiserror::Error;

static PROJECT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9\-_]+$").expect("valid project name regex"));

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Parsed but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Retention configuration
///
/// # Examples
///
/// ```no_run
/// use stratum_retention::RetentionConfig;
///
/// let config = RetentionConfig::from_file("/etc/stratum/config.toml").unwrap();
/// for project in &config.projects {
///     println!("{} -> {}", project.name, config.project_root(project).display());
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Backup root; every project gets `<folder>/<name>/`
    pub folder: PathBuf,

    /// Day on which the weekly horizon rotates
    /// Default: Monday
    #[serde(default = "default_weekly_day")]
    pub weekly_day: Weekday,

    /// Projects in processing order
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

/// One backed-up project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Path-safe name, also the artifact stem
    pub name: String,

    /// Disabled projects are skipped entirely
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Artifact extension without the leading dot, e.g. `sql.gz`
    pub extension: String,

    /// Keep-counts per horizon
    #[serde(default)]
    pub interval: KeepCounts,
}

fn default_weekly_day() -> Weekday {
    Weekday::Mon
}

fn default_enabled() -> bool {
    true
}

impl RetentionConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: RetentionConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check names, extensions and the backup root
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut known = HashSet::new();
        for project in &self.projects {
            if !known.insert(project.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate project name '{}', all names need to be unique",
                    project.name
                )));
            }
            if !PROJECT_NAME_RE.is_match(&project.name) {
                return Err(ConfigError::Invalid(format!(
                    "Project name '{}' needs to be lowercase and path-safe (a-z0-9-_)",
                    project.name
                )));
            }
            validate_extension(project)?;
        }

        if !self.folder.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "Backup folder should be an absolute path: {}",
                self.folder.display()
            )));
        }
        match std::fs::metadata(&self.folder) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ConfigError::Invalid(format!(
                "Backup folder isn't a directory: {}",
                self.folder.display()
            ))),
            Err(_) => Err(ConfigError::Invalid(format!(
                "Backup folder doesn't exist: {}",
                self.folder.display()
            ))),
        }
    }

    /// Look up a project by name
    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Root directory of a project's horizons
    pub fn project_root(&self, project: &ProjectConfig) -> PathBuf {
        self.folder.join(&project.name)
    }
}

fn validate_extension(project: &ProjectConfig) -> Result<(), ConfigError> {
    let ext = &project.extension;
    let invalid = |reason: &str| {
        ConfigError::Invalid(format!(
            "Extension '{}' of project '{}' {}",
            ext, project.name, reason
        ))
    };

    if ext.is_empty() {
        return Err(invalid("is empty"));
    }
    if ext.starts_with('.') {
        return Err(invalid("should not start with a dot"));
    }
    if ext.contains('/') || ext.contains('\\') {
        return Err(invalid("contains a path separator"));
    }

    let sample = ArtifactName::new(&project.name, chrono::NaiveDate::default(), ext);
    if !ArtifactName::matches(sample.file_name()) {
        return Err(invalid("does not produce a dated artifact name"));
    }
    Ok(())
}

//! Command implementations.

pub mod check;
pub mod plan;
pub mod purge;
pub mod rotate;

pub use self::check::execute_check;
pub use self::plan::execute_plan;
pub use self::purge::execute_purge;
pub use self::rotate::execute_rotate;

use crate::error::{CliError, Result};
use stratum_retention::{ProjectConfig, RetentionConfig};

/// Projects a command applies to: the named one, or every configured project.
pub(crate) fn select_projects(config: &RetentionConfig, name: Option<&str>) -> Result<Vec<ProjectConfig>> {
    match name {
        Some(name) => config
            .project(name)
            .cloned()
            .map(|project| vec![project])
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown project '{}'", name))),
        None => Ok(config.projects.clone()),
    }
}

/// Today in local time, unless a date was given.
pub(crate) fn today_or(date: Option<chrono::NaiveDate>) -> chrono::NaiveDate {
    date.unwrap_or_else(|| chrono::Local::now().date_naive())
}

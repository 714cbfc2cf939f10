//! Check command implementation.

use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;
use stratum_retention::RetentionConfig;

/// Execute the check command.
///
/// Loading already validated the configuration; this reports what was found.
pub fn execute_check(path: &Path, config: &RetentionConfig, formatter: &Formatter) -> Result<()> {
    eprintln!(
        "{}",
        formatter.success(&format!(
            "{} is valid ({} project(s) under {})",
            path.display(),
            config.projects.len(),
            config.folder.display()
        ))
    );
    println!("{}", formatter.format_projects(config)?);
    Ok(())
}

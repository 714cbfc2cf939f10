//! Rotate command implementation.

use crate::cli::RotateArgs;
use crate::commands::today_or;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use stratum_domain::ArtifactName;
use stratum_retention::{RetentionConfig, Rotator};

/// Execute the rotate command.
pub fn execute_rotate(args: RotateArgs, config: RetentionConfig, formatter: &Formatter) -> Result<()> {
    let project = config
        .project(&args.project)
        .cloned()
        .ok_or_else(|| CliError::InvalidInput(format!("Unknown project '{}'", args.project)))?;
    if !project.enabled {
        return Err(CliError::InvalidInput(format!("Project '{}' is disabled", project.name)));
    }
    check_artifact(&args, &project.extension)?;

    let today = today_or(args.date);
    let mut rotator = Rotator::new(config);
    let outcome = rotator.rotate_file(&project, &args.file, today)?;

    println!("{}", formatter.format_rotation(&project.name, &outcome)?);
    Ok(())
}

/// The file must exist and carry a dated name with the project's extension.
fn check_artifact(args: &RotateArgs, extension: &str) -> Result<()> {
    if !args.file.is_file() {
        return Err(CliError::InvalidInput(format!("{} is not a file", args.file.display())));
    }

    let name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(ArtifactName::parse)
        .ok_or_else(|| {
            CliError::InvalidInput(format!(
                "{} is not named <name>_<YYYY-MM-DD>.<extension>",
                args.file.display()
            ))
        })?;

    if name.extension() != extension {
        return Err(CliError::InvalidInput(format!(
            "{} does not have extension .{}",
            args.file.display(),
            extension
        )));
    }
    Ok(())
}

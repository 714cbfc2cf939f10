//! Purge command implementation.

use crate::cli::PurgeArgs;
use crate::commands::select_projects;
use crate::error::{CliError, Result};
use crate::output::{Formatter, ProjectPurge};
use stratum_retention::{ProjectConfig, RetentionConfig, RetentionError, Rotator};

/// Execute the purge command.
pub fn execute_purge(args: PurgeArgs, config: RetentionConfig, formatter: &Formatter) -> Result<()> {
    let projects = select_projects(&config, args.project.as_deref())?;
    let mut rotator = Rotator::new(config);

    let (purges, failures) = purge_projects(&mut rotator, &projects, args.dry_run);
    for (project, error) in &failures {
        eprintln!("{}", formatter.error(&format!("{}: {}", project, error)));
    }
    println!("{}", formatter.format_purges(&purges)?);
    tracing::info!("{}", rotator.metrics().summary());

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::ProjectsFailed {
            failed: failures.len(),
            total: purges.len() + failures.len(),
        })
    }
}

fn purge_projects(
    rotator: &mut Rotator,
    projects: &[ProjectConfig],
    dry_run: bool,
) -> (Vec<ProjectPurge>, Vec<(String, RetentionError)>) {
    let mut purges = Vec::new();
    let mut failures = Vec::new();

    for project in projects.iter().filter(|p| p.enabled) {
        match rotator.purge_project(project, dry_run) {
            Ok(reports) => purges.push(ProjectPurge {
                project: project.name.clone(),
                reports,
            }),
            Err(e) => failures.push((project.name.clone(), e)),
        }
    }

    (purges, failures)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::commands::test_support::config;
    use std::fs;
    use stratum_domain::{Horizon, KeepCounts};
    use tempfile::TempDir;

    fn seed(dir: &TempDir) {
        let daily = dir.path().join("shop/daily");
        fs::create_dir_all(&daily).unwrap();
        for day in 1..=4 {
            fs::write(daily.join(format!("shop_2024-03-0{}.sql.gz", day)), b"dump").unwrap();
        }
    }

    #[test]
    fn test_purge_trims_daily() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let config = config(&dir, KeepCounts::new(2, 0, 0));
        let projects = config.projects.clone();
        let mut rotator = Rotator::new(config);

        let (purges, failures) = purge_projects(&mut rotator, &projects, false);

        assert!(failures.is_empty());
        assert_eq!(purges.len(), 1);
        let daily = &purges[0].reports[0];
        assert_eq!(daily.horizon, Horizon::Daily);
        assert_eq!(daily.deleted(), 2);
        assert_eq!(fs::read_dir(dir.path().join("shop/daily")).unwrap().count(), 2);
    }

    #[test]
    fn test_dry_run_keeps_files() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let config = config(&dir, KeepCounts::new(2, 0, 0));
        let projects = config.projects.clone();
        let mut rotator = Rotator::new(config);

        let (purges, _) = purge_projects(&mut rotator, &projects, true);

        assert_eq!(purges[0].reports[0].deleted(), 2);
        assert_eq!(fs::read_dir(dir.path().join("shop/daily")).unwrap().count(), 4);
    }
}

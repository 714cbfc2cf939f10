//! Plan command implementation.

use crate::cli::PlanArgs;
use crate::commands::{select_projects, today_or};
use crate::error::{CliError, Result};
use crate::output::{Formatter, ProjectPlan};
use chrono::NaiveDate;
use stratum_retention::{ProjectConfig, RetentionConfig, RetentionError, Rotator};

/// Execute the plan command.
pub fn execute_plan(args: PlanArgs, config: RetentionConfig, formatter: &Formatter) -> Result<()> {
    let projects = select_projects(&config, args.project.as_deref())?;
    let today = today_or(args.date);
    let rotator = Rotator::new(config);

    let (plans, failures) = plan_projects(&rotator, &projects, today);
    for (project, error) in &failures {
        eprintln!("{}", formatter.error(&format!("{}: {}", project, error)));
    }
    println!("{}", formatter.format_plans(&plans)?);

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::ProjectsFailed {
            failed: failures.len(),
            total: plans.len() + failures.len(),
        })
    }
}

/// Evaluate every enabled project; failures do not stop the others.
fn plan_projects(
    rotator: &Rotator,
    projects: &[ProjectConfig],
    today: NaiveDate,
) -> (Vec<ProjectPlan>, Vec<(String, RetentionError)>) {
    let mut plans = Vec::new();
    let mut failures = Vec::new();

    for project in projects.iter().filter(|p| p.enabled) {
        match rotator.plan_project(project, today) {
            Ok((ensured, due)) => plans.push(ProjectPlan {
                project: project.name.clone(),
                date: today,
                due,
                created: ensured.created,
            }),
            Err(e) => failures.push((project.name.clone(), e)),
        }
    }

    (plans, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::config;
    use std::fs;
    use stratum_domain::KeepCounts;
    use tempfile::TempDir;

    #[test]
    fn test_plan_skips_disabled_and_creates_tree() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, KeepCounts::new(7, 4, 12));
        let projects = config.projects.clone();
        let rotator = Rotator::new(config);

        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let (plans, failures) = plan_projects(&rotator, &projects, today);

        assert!(failures.is_empty());
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].project, "shop");
        assert!(plans[0].due.daily && plans[0].due.weekly && plans[0].due.monthly);
        assert_eq!(plans[0].created.len(), 4);
        assert!(dir.path().join("shop/monthly").is_dir());
        assert!(!dir.path().join("wiki").exists());
    }

    #[test]
    fn test_plan_reports_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("shop"), "in the way").unwrap();
        let config = config(&dir, KeepCounts::new(7, 0, 0));
        let projects = config.projects.clone();
        let rotator = Rotator::new(config);

        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let (plans, failures) = plan_projects(&rotator, &projects, today);

        assert!(plans.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "shop");
    }
}

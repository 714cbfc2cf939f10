//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::NaiveDate;
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use stratum_domain::{DueSet, Horizon};
use stratum_retention::{ProjectOutcome, PurgeAction, PurgeReport, RetentionConfig};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Due evaluation of one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPlan {
    /// Project name
    pub project: String,
    /// Date evaluated
    pub date: NaiveDate,
    /// Horizons that would take an artifact
    pub due: DueSet,
    /// Directories created while ensuring the tree
    pub created: Vec<PathBuf>,
}

/// Purge results of one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPurge {
    /// Project name
    pub project: String,
    /// One report per horizon, fastest first
    pub reports: Vec<PurgeReport>,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the configured projects.
    pub fn format_projects(&self, config: &RetentionConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            OutputFormat::Quiet => {
                let names: Vec<&str> = config.projects.iter().map(|p| p.name.as_str()).collect();
                Ok(names.join("\n"))
            }
            OutputFormat::Table => {
                if config.projects.is_empty() {
                    return Ok(self.colorize("No projects configured.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Project", "Enabled", "Extension", "Daily", "Weekly", "Monthly"]);
                for project in &config.projects {
                    builder.push_record([
                        project.name.clone(),
                        yes_no(project.enabled).to_string(),
                        project.extension.clone(),
                        project.interval.daily.to_string(),
                        project.interval.weekly.to_string(),
                        project.interval.monthly.to_string(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format due evaluations.
    pub fn format_plans(&self, plans: &[ProjectPlan]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(plans)?),
            OutputFormat::Quiet => Ok(plans
                .iter()
                .map(|plan| format!("{}: {}", plan.project, horizon_list(&plan.due.due_horizons())))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if plans.is_empty() {
                    return Ok(self.colorize("No projects to plan.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Project", "Date", "Daily", "Weekly", "Monthly", "Created"]);
                for plan in plans {
                    builder.push_record([
                        plan.project.clone(),
                        plan.date.to_string(),
                        yes_no(plan.due.daily).to_string(),
                        yes_no(plan.due.weekly).to_string(),
                        yes_no(plan.due.monthly).to_string(),
                        plan.created.len().to_string(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format the outcome of rotating one project.
    pub fn format_rotation(&self, project: &str, outcome: &ProjectOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Quiet => Ok(match outcome {
                ProjectOutcome::Rotated { placement, .. } => placement.file_name.clone(),
                _ => String::new(),
            }),
            OutputFormat::Table => match outcome {
                ProjectOutcome::Disabled => Ok(self.warning(&format!("Project {} is disabled", project))),
                ProjectOutcome::NotDue { .. } => {
                    Ok(self.info(&format!("No horizon of {} needs an artifact today", project)))
                }
                ProjectOutcome::Rotated {
                    placement, purges, ..
                } => {
                    let mut builder = Builder::default();
                    builder.push_record(["Horizon", "Entry"]);
                    builder.push_record([
                        placement.owner.to_string(),
                        placement.file_name.clone(),
                    ]);
                    for link in &placement.links {
                        builder.push_record([
                            link.horizon.to_string(),
                            format!("-> {}", link.target.display()),
                        ]);
                    }

                    let deleted: usize = purges.iter().map(PurgeReport::deleted).sum();
                    let relocated: usize = purges.iter().map(PurgeReport::relocated).sum();
                    Ok(format!(
                        "{}\n{}\n{}",
                        self.success(&format!("Rotated {} into {}", placement.file_name, project)),
                        self.render(builder),
                        self.info(&format!("Purged {} entries, relocated {}", deleted, relocated))
                    ))
                }
            },
        }
    }

    /// Format purge results.
    pub fn format_purges(&self, purges: &[ProjectPurge]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(purges)?),
            OutputFormat::Quiet => Ok(purges
                .iter()
                .flat_map(|p| p.reports.iter())
                .flat_map(|r| r.actions.iter())
                .map(|action| match action {
                    PurgeAction::Deleted { file_name } | PurgeAction::Relocated { file_name, .. } => {
                        file_name.as_str()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Project", "Horizon", "File", "Action"]);
                let mut rows = 0;
                let mut dry_run = false;
                for purge in purges {
                    for report in &purge.reports {
                        dry_run |= report.dry_run;
                        for action in &report.actions {
                            let (file_name, what) = match action {
                                PurgeAction::Deleted { file_name } => (file_name, "deleted".to_string()),
                                PurgeAction::Relocated { file_name, to } => {
                                    (file_name, format!("moved to {}", to))
                                }
                            };
                            builder.push_record([
                                purge.project.clone(),
                                report.horizon.to_string(),
                                file_name.clone(),
                                what,
                            ]);
                            rows += 1;
                        }
                    }
                }

                if rows == 0 {
                    return Ok(self.colorize("Nothing to purge.", "green"));
                }
                let table = self.render(builder);
                if dry_run {
                    Ok(format!("{}\n{}", self.warning("Dry run, nothing was changed"), table))
                } else {
                    Ok(table)
                }
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "-"
    }
}

fn horizon_list(horizons: &[Horizon]) -> String {
    if horizons.is_empty() {
        return "none".to_string();
    }
    horizons.iter().map(Horizon::as_str).collect::<Vec<_>>().join(",")
}

//! Per-project rotation: ensure, evaluate, produce, place, purge

use crate::due::DueEvaluator;
use crate::layout::{EnsureReport, ProjectLayout};
use crate::placement::{place, PlacementReport};
use crate::purge::{PurgeReport, Purger};
use crate::{ProjectConfig, RetentionConfig, RetentionError, RotationMetrics};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;
use stratum_domain::{ArtifactName, ArtifactProducer, DueSet};

/// What a project run ended with
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProjectOutcome {
    /// Project is disabled in the configuration
    Disabled,
    /// No horizon needed an artifact, nothing was produced
    NotDue {
        /// The (empty) due set
        due: DueSet,
    },
    /// A new artifact was placed and retention enforced
    Rotated {
        /// Horizons that were due
        due: DueSet,
        /// Where the artifact went
        placement: PlacementReport,
        /// Purge result per horizon, fastest first
        purges: Vec<PurgeReport>,
    },
}

/// Result for one project within a run
#[derive(Debug)]
pub struct ProjectResult {
    /// Project name
    pub project: String,
    /// Outcome, or the error that stopped this project
    pub outcome: Result<ProjectOutcome, RetentionError>,
}

/// Results of a run over every configured project
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per project, in configuration order
    pub results: Vec<ProjectResult>,
}

impl RunReport {
    /// Projects that failed, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &RetentionError)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Err(e) => Some((r.project.as_str(), e)),
            Ok(_) => None,
        })
    }

    /// True when no project failed
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Runs the rotation sequence for configured projects
///
/// Steps within a project are strictly sequential, each one reading what the
/// previous one left on disk. A failing project never stops the others.
///
/// # Examples
///
/// ```no_run
/// use stratum_domain::ArtifactProducer;
/// use stratum_retention::{RetentionConfig, Rotator};
/// use std::path::Path;
///
/// struct Touch;
///
/// impl ArtifactProducer for Touch {
///     type Error = std::io::Error;
///
///     fn produce(&mut self, _project: &str, target: &Path) -> Result<(), Self::Error> {
///         std::fs::write(target, b"backup")
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RetentionConfig::from_file("/etc/stratum/config.toml")?;
/// let mut rotator = Rotator::new(config);
///
/// let today = chrono::Local::now().date_naive();
/// let report = rotator.run(&mut Touch, today);
/// println!("{}", rotator.metrics().summary());
/// assert!(report.is_success());
/// # Ok(())
/// # }
/// ```
pub struct Rotator {
    config: RetentionConfig,
    evaluator: DueEvaluator,
    metrics: RotationMetrics,
}

impl Rotator {
    /// Create a rotator for the given configuration
    pub fn new(config: RetentionConfig) -> Self {
        Self {
            evaluator: DueEvaluator::new(config.weekly_day),
            config,
            metrics: RotationMetrics::new(),
        }
    }

    /// The configuration this rotator works on
    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &RotationMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Layout of a project's horizon tree
    pub fn layout(&self, project: &ProjectConfig) -> ProjectLayout {
        ProjectLayout::new(self.config.project_root(project))
    }

    /// Rotate every configured project, isolating failures per project
    pub fn run<P>(&mut self, producer: &mut P, today: NaiveDate) -> RunReport
    where
        P: ArtifactProducer,
        P::Error: Display,
    {
        tracing::info!("---- Starting rotation of {} projects", self.config.projects.len());

        let mut report = RunReport::default();
        for project in self.config.projects.clone() {
            let outcome = self.rotate_project(&project, producer, today);
            report.results.push(ProjectResult {
                project: project.name,
                outcome,
            });
        }

        tracing::info!("---- Rotation done");
        report
    }

    /// Ensure directories and evaluate what today's artifact would be due in
    ///
    /// Nothing is produced or purged.
    pub fn plan_project(
        &self,
        project: &ProjectConfig,
        today: NaiveDate,
    ) -> Result<(EnsureReport, DueSet), RetentionError> {
        let layout = self.layout(project);
        let ensured = layout.ensure()?;
        let name = ArtifactName::new(&project.name, today, &project.extension);
        let due = self
            .evaluator
            .evaluate(&layout, name.file_name(), &project.interval, today)?;
        Ok((ensured, due))
    }

    /// Full rotation of one project with a producer for today's artifact
    pub fn rotate_project<P>(
        &mut self,
        project: &ProjectConfig,
        producer: &mut P,
        today: NaiveDate,
    ) -> Result<ProjectOutcome, RetentionError>
    where
        P: ArtifactProducer,
        P::Error: Display,
    {
        if !project.enabled {
            tracing::info!("Skipping project {} (is disabled)", project.name);
            self.metrics.record_skipped();
            return Ok(ProjectOutcome::Disabled);
        }

        tracing::info!("Starting rotation of project {}", project.name);
        let result = self.rotate_inner(project, producer, today);
        self.record(project, &result);
        result
    }

    /// Rotate an artifact that was produced outside the engine
    ///
    /// The file's name must be a dated artifact name; it is placed under that
    /// name. When no horizon is due the file is left untouched.
    pub fn rotate_file(
        &mut self,
        project: &ProjectConfig,
        file: &Path,
        today: NaiveDate,
    ) -> Result<ProjectOutcome, RetentionError> {
        if !project.enabled {
            tracing::info!("Skipping project {} (is disabled)", project.name);
            self.metrics.record_skipped();
            return Ok(ProjectOutcome::Disabled);
        }

        let result = self.rotate_file_inner(project, file, today);
        self.record(project, &result);
        result
    }

    /// Enforce keep-counts of one project without producing anything
    ///
    /// With `dry_run` the reports list what would go, and nothing is touched.
    /// Rotation itself always purges for real.
    pub fn purge_project(
        &mut self,
        project: &ProjectConfig,
        dry_run: bool,
    ) -> Result<Vec<PurgeReport>, RetentionError> {
        let layout = self.layout(project);
        layout.ensure()?;
        let purges = Purger::new(dry_run).purge_all(&layout, &project.interval)?;
        for purge in &purges {
            self.metrics.record_purge(purge);
        }
        Ok(purges)
    }

    fn rotate_inner<P>(
        &mut self,
        project: &ProjectConfig,
        producer: &mut P,
        today: NaiveDate,
    ) -> Result<ProjectOutcome, RetentionError>
    where
        P: ArtifactProducer,
        P::Error: Display,
    {
        let (_, due) = self.plan_project(project, today)?;
        if !due.any() {
            tracing::info!("No backup required today for {}", project.name);
            return Ok(ProjectOutcome::NotDue { due });
        }

        let layout = self.layout(project);
        let name = ArtifactName::new(&project.name, today, &project.extension);
        let target = layout.root().join(name.file_name());

        tracing::info!("Producing artifact {}", target.display());
        producer
            .produce(&project.name, &target)
            .map_err(|e| RetentionError::Producer {
                project: project.name.clone(),
                message: e.to_string(),
            })?;

        self.place_and_purge(&layout, project, &target, due)
    }

    fn rotate_file_inner(
        &mut self,
        project: &ProjectConfig,
        file: &Path,
        today: NaiveDate,
    ) -> Result<ProjectOutcome, RetentionError> {
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                RetentionError::Config(format!("Not an artifact file: {}", file.display()))
            })?;

        let layout = self.layout(project);
        layout.ensure()?;
        let due = self
            .evaluator
            .evaluate(&layout, file_name, &project.interval, today)?;
        if !due.any() {
            tracing::info!("No horizon needs {}, leaving it in place", file.display());
            return Ok(ProjectOutcome::NotDue { due });
        }

        self.place_and_purge(&layout, project, file, due)
    }

    fn place_and_purge(
        &mut self,
        layout: &ProjectLayout,
        project: &ProjectConfig,
        artifact: &Path,
        due: DueSet,
    ) -> Result<ProjectOutcome, RetentionError> {
        tracing::info!("Rotating {} into backups", artifact.display());
        let placement = place(artifact, layout, &due)?;
        self.metrics.record_placement(&placement);

        let purges = Purger::new(false).purge_all(layout, &project.interval)?;
        for purge in &purges {
            self.metrics.record_purge(purge);
        }

        Ok(ProjectOutcome::Rotated {
            due,
            placement,
            purges,
        })
    }

    fn record(&mut self, project: &ProjectConfig, result: &Result<ProjectOutcome, RetentionError>) {
        match result {
            Ok(ProjectOutcome::Rotated { .. }) => self.metrics.record_rotated(),
            Ok(_) => self.metrics.record_skipped(),
            Err(e) => {
                tracing::error!("Rotation of {} failed: {}", project.name, e);
                self.metrics.record_failure();
            }
        }
    }
}

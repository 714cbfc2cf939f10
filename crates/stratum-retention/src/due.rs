//! Due evaluator: which horizons need a new artifact today

use crate::history;
use crate::layout::{entry_kind, ProjectLayout};
use crate::RetentionError;
use chrono::{NaiveDate, Weekday};
use stratum_domain::{ArtifactName, DueSet, Horizon, KeepCounts};

/// Decides per horizon whether an artifact must be produced
///
/// A horizon is due when it is enabled, does not already hold the target
/// name, and either its calendar rule fires today or it holds no artifacts
/// at all. The empty-history override lets a horizon that was just brought
/// into service start immediately instead of waiting for its next boundary.
#[derive(Debug, Clone, Copy)]
pub struct DueEvaluator {
    weekly_day: Weekday,
}

impl Default for DueEvaluator {
    fn default() -> Self {
        Self::new(Weekday::Mon)
    }
}

impl DueEvaluator {
    /// Evaluator whose weekly horizon rotates on `weekly_day`
    pub fn new(weekly_day: Weekday) -> Self {
        Self { weekly_day }
    }

    /// Evaluate every horizon of a project for `file_name` on `today`
    ///
    /// The project tree must already exist (see [`ProjectLayout::ensure`]).
    ///
    /// # Errors
    ///
    /// [`RetentionError::Config`] when every keep-count is 0 or `file_name` is
    /// not a bare dated artifact name; [`RetentionError::Io`] when an
    /// existence check or listing fails.
    pub fn evaluate(
        &self,
        layout: &ProjectLayout,
        file_name: &str,
        keep: &KeepCounts,
        today: NaiveDate,
    ) -> Result<DueSet, RetentionError> {
        if !keep.any_enabled() {
            return Err(RetentionError::Config(format!(
                "All keep-counts are 0 for {}, this backup will never run",
                layout.root().display()
            )));
        }
        if file_name.contains('/') || file_name.contains('\\') || !ArtifactName::matches(file_name) {
            return Err(RetentionError::Config(format!(
                "'{}' is not a dated artifact name (<name>_<YYYY-MM-DD>.<ext>)",
                file_name
            )));
        }

        let mut due = DueSet::default();
        for horizon in Horizon::SLOWEST_FIRST {
            due.set(horizon, self.is_due(layout, horizon, file_name, keep, today)?);
        }

        tracing::debug!(
            "Due set for {} on {}: daily={} weekly={} monthly={}",
            file_name,
            today,
            due.daily,
            due.weekly,
            due.monthly
        );
        Ok(due)
    }

    fn is_due(
        &self,
        layout: &ProjectLayout,
        horizon: Horizon,
        file_name: &str,
        keep: &KeepCounts,
        today: NaiveDate,
    ) -> Result<bool, RetentionError> {
        if !keep.is_enabled(horizon) {
            return Ok(false);
        }

        if entry_kind(&layout.entry_path(horizon, file_name))?.is_some() {
            tracing::info!("File {}/{} already exists", horizon, file_name);
            return Ok(false);
        }

        if horizon.is_calendar_due(today, self.weekly_day) {
            return Ok(true);
        }

        // Not our day, but a horizon without any history starts right away
        Ok(history::list(&layout.horizon_dir(horizon))?.is_empty())
    }
}

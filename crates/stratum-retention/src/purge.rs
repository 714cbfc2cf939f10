//! Retention purger: enforce keep-counts without breaking faster horizons
//!
//! Expiring an artifact from a slower horizon must not leave a dangling link
//! behind in a faster one. When a faster horizon still links to the expired
//! entry, the link is removed and the entry is moved into its place: the
//! faster horizon becomes the new owner and keeps the same entry count.

use crate::history;
use crate::layout::{entry_kind, EntryKind, ProjectLayout};
use crate::RetentionError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use stratum_domain::{ArtifactName, Horizon, KeepCounts};

/// What happened to one expired entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PurgeAction {
    /// Nothing referenced it; removed
    Deleted {
        /// Expired artifact
        file_name: String,
    },
    /// Moved over the link a faster horizon held for it
    Relocated {
        /// Expired artifact
        file_name: String,
        /// Horizon that now owns the entry
        to: Horizon,
    },
}

/// Outcome of purging one horizon
#[derive(Debug, Clone, Serialize)]
pub struct PurgeReport {
    /// Purged horizon
    pub horizon: Horizon,
    /// Entries left in the horizon
    pub kept: usize,
    /// Expired entries, oldest first
    pub actions: Vec<PurgeAction>,
    /// Actions were only planned
    pub dry_run: bool,
}

impl PurgeReport {
    fn untouched(horizon: Horizon, dry_run: bool) -> Self {
        Self {
            horizon,
            kept: 0,
            actions: Vec::new(),
            dry_run,
        }
    }

    /// Number of entries deleted outright
    pub fn deleted(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, PurgeAction::Deleted { .. }))
            .count()
    }

    /// Number of entries handed over to a faster horizon
    pub fn relocated(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, PurgeAction::Relocated { .. }))
            .count()
    }
}

/// Enforces keep-counts per horizon
#[derive(Debug, Clone, Copy, Default)]
pub struct Purger {
    dry_run: bool,
}

impl Purger {
    /// Create a purger; in dry-run mode nothing on disk changes
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Purge every horizon of a project, fastest first
    ///
    /// Stops at the first failing horizon; horizons purged before it stay
    /// purged.
    pub fn purge_all(
        &self,
        layout: &ProjectLayout,
        keep: &KeepCounts,
    ) -> Result<Vec<PurgeReport>, RetentionError> {
        Horizon::FASTEST_FIRST
            .into_iter()
            .map(|horizon| self.purge_horizon(layout, horizon, keep))
            .collect()
    }

    /// Remove the oldest entries of one horizon beyond its keep-count
    ///
    /// Disabled horizons (keep-count 0) are not even listed.
    ///
    /// # Errors
    ///
    /// [`RetentionError::Integrity`] when a faster horizon holds a real file
    /// under the expired name, or a link there does not resolve to the
    /// expired entry. [`RetentionError::Io`] on list, delete or move failures.
    pub fn purge_horizon(
        &self,
        layout: &ProjectLayout,
        horizon: Horizon,
        keep: &KeepCounts,
    ) -> Result<PurgeReport, RetentionError> {
        let keep_count = keep.get(horizon) as usize;
        if keep_count == 0 {
            return Ok(PurgeReport::untouched(horizon, self.dry_run));
        }

        let artifacts = history::list_oldest_first(&layout.horizon_dir(horizon))?;
        let excess = artifacts.len().saturating_sub(keep_count);
        let mut report = PurgeReport {
            horizon,
            kept: artifacts.len() - excess,
            actions: Vec::with_capacity(excess),
            dry_run: self.dry_run,
        };
        if excess == 0 {
            return Ok(report);
        }

        tracing::debug!(
            "{} holds {} artifacts, keeping {}, expiring {}",
            layout.horizon_dir(horizon).display(),
            artifacts.len(),
            keep_count,
            excess
        );

        for artifact in artifacts.iter().take(excess) {
            report.actions.push(self.expire(layout, horizon, artifact)?);
        }

        Ok(report)
    }

    fn expire(
        &self,
        layout: &ProjectLayout,
        horizon: Horizon,
        artifact: &ArtifactName,
    ) -> Result<PurgeAction, RetentionError> {
        let file_name = artifact.file_name().to_string();
        let current = layout.entry_path(horizon, &file_name);

        if let Some((to, link)) = find_referencing_link(layout, horizon, &current, &file_name)? {
            if !self.dry_run {
                fs::remove_file(&link).map_err(RetentionError::io("delete link", &link))?;
                // `current` may itself be a link; relative targets keep the same depth
                fs::rename(&current, &link).map_err(RetentionError::io("move", &current))?;
            }
            tracing::info!(
                "{}Moved {} to {}",
                self.prefix(),
                current.display(),
                link.display()
            );
            return Ok(PurgeAction::Relocated { file_name, to });
        }

        if !self.dry_run {
            fs::remove_file(&current).map_err(RetentionError::io("delete", &current))?;
        }
        tracing::info!("{}Deleted {}", self.prefix(), current.display());
        Ok(PurgeAction::Deleted { file_name })
    }

    fn prefix(&self) -> &'static str {
        if self.dry_run {
            "DRY RUN: "
        } else {
            ""
        }
    }
}

/// Search faster horizons, nearest first, for a link to `current`
///
/// The search stops at the first horizon holding anything under the name:
/// a link there is the reference, a real file there is a broken chain.
/// Disabled horizons are searched too: links left over from an earlier
/// configuration still point at `current`.
fn find_referencing_link(
    layout: &ProjectLayout,
    horizon: Horizon,
    current: &Path,
    file_name: &str,
) -> Result<Option<(Horizon, PathBuf)>, RetentionError> {
    for neighbour in horizon.faster_chain() {
        let candidate = layout.entry_path(neighbour, file_name);
        match entry_kind(&candidate)? {
            None => continue,
            Some(EntryKind::Real) => {
                return Err(RetentionError::Integrity(format!(
                    "{} should be a link ready for rotation but is a real file",
                    candidate.display()
                )));
            }
            Some(EntryKind::Link) => {
                ensure_resolves_to(&candidate, current)?;
                return Ok(Some((neighbour, candidate)));
            }
        }
    }

    Ok(None)
}

fn ensure_resolves_to(link: &Path, current: &Path) -> Result<(), RetentionError> {
    let resolved = fs::canonicalize(link).map_err(|e| {
        RetentionError::Integrity(format!("Link {} does not resolve: {}", link.display(), e))
    })?;
    let expected = fs::canonicalize(current).map_err(|e| {
        RetentionError::Integrity(format!("Entry {} does not resolve: {}", current.display(), e))
    })?;

    if resolved != expected {
        return Err(RetentionError::Integrity(format!(
            "Link {} resolves to {} instead of {}",
            link.display(),
            resolved.display(),
            expected.display()
        )));
    }
    Ok(())
}

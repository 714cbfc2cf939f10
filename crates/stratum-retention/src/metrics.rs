//! Metrics collection for rotation runs

use crate::{PlacementReport, PurgeReport};
use serde::Serialize;
use std::collections::BTreeMap;
use stratum_domain::Horizon;

/// Metrics collected while rotating projects
///
/// Tracks files placed, links created, entries deleted and relocated per
/// horizon, and how projects fared.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RotationMetrics {
    /// Real files moved into a horizon
    pub placed: BTreeMap<Horizon, usize>,

    /// Links created in a horizon
    pub linked: BTreeMap<Horizon, usize>,

    /// Entries deleted per horizon
    pub deleted: BTreeMap<Horizon, usize>,

    /// Entries handed over to a faster horizon, keyed by the horizon they left
    pub relocated: BTreeMap<Horizon, usize>,

    /// Projects that received a new artifact
    pub projects_rotated: usize,

    /// Projects with nothing due, or disabled
    pub projects_skipped: usize,

    /// Projects that failed
    pub projects_failed: usize,
}

impl RotationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where an artifact was placed
    pub fn record_placement(&mut self, report: &PlacementReport) {
        *self.placed.entry(report.owner).or_insert(0) += 1;
        for link in &report.links {
            *self.linked.entry(link.horizon).or_insert(0) += 1;
        }
    }

    /// Record a purge; dry runs change nothing and are not counted
    pub fn record_purge(&mut self, report: &PurgeReport) {
        if report.dry_run {
            return;
        }
        let deleted = report.deleted();
        if deleted > 0 {
            *self.deleted.entry(report.horizon).or_insert(0) += deleted;
        }
        let relocated = report.relocated();
        if relocated > 0 {
            *self.relocated.entry(report.horizon).or_insert(0) += relocated;
        }
    }

    /// Record a rotated project
    pub fn record_rotated(&mut self) {
        self.projects_rotated += 1;
    }

    /// Record a skipped project
    pub fn record_skipped(&mut self) {
        self.projects_skipped += 1;
    }

    /// Record a failed project
    pub fn record_failure(&mut self) {
        self.projects_failed += 1;
    }

    /// Total entries deleted across all horizons
    pub fn total_deleted(&self) -> usize {
        self.deleted.values().sum()
    }

    /// Total entries relocated across all horizons
    pub fn total_relocated(&self) -> usize {
        self.relocated.values().sum()
    }

    /// Total links created across all horizons
    pub fn total_linked(&self) -> usize {
        self.linked.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Rotation Metrics Summary".to_string(),
            "========================".to_string(),
            format!(
                "Projects: {} rotated, {} skipped, {} failed",
                self.projects_rotated, self.projects_skipped, self.projects_failed
            ),
            String::new(),
        ];

        for (title, counts) in [
            ("Real files placed", &self.placed),
            ("Links created", &self.linked),
            ("Deleted", &self.deleted),
            ("Relocated from", &self.relocated),
        ] {
            if counts.is_empty() {
                continue;
            }
            lines.push(format!("{}:", title));
            for (horizon, count) in counts {
                lines.push(format!("  {}: {}", horizon, count));
            }
            lines.push(format!("  Total: {}", counts.values().sum::<usize>()));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlacedLink, PurgeAction};
    use std::path::PathBuf;

    fn placement() -> PlacementReport {
        PlacementReport {
            file_name: "db_2024-01-01.sql".to_string(),
            owner: Horizon::Monthly,
            links: vec![
                PlacedLink {
                    horizon: Horizon::Weekly,
                    target: PathBuf::from("../monthly/db_2024-01-01.sql"),
                },
                PlacedLink {
                    horizon: Horizon::Daily,
                    target: PathBuf::from("../weekly/db_2024-01-01.sql"),
                },
            ],
        }
    }

    fn purge(dry_run: bool) -> PurgeReport {
        PurgeReport {
            horizon: Horizon::Weekly,
            kept: 4,
            actions: vec![
                PurgeAction::Deleted {
                    file_name: "db_2023-11-06.sql".to_string(),
                },
                PurgeAction::Relocated {
                    file_name: "db_2023-11-13.sql".to_string(),
                    to: Horizon::Daily,
                },
            ],
            dry_run,
        }
    }

    #[test]
    fn test_metrics_creation() {
        let metrics = RotationMetrics::new();
        assert_eq!(metrics.total_deleted(), 0);
        assert_eq!(metrics.total_relocated(), 0);
        assert_eq!(metrics.projects_rotated, 0);
    }

    #[test]
    fn test_record_placement() {
        let mut metrics = RotationMetrics::new();
        metrics.record_placement(&placement());

        assert_eq!(metrics.placed.get(&Horizon::Monthly), Some(&1));
        assert_eq!(metrics.total_linked(), 2);
    }

    #[test]
    fn test_record_purge() {
        let mut metrics = RotationMetrics::new();
        metrics.record_purge(&purge(false));
        metrics.record_purge(&purge(false));

        assert_eq!(metrics.deleted.get(&Horizon::Weekly), Some(&2));
        assert_eq!(metrics.total_relocated(), 2);
    }

    #[test]
    fn test_dry_run_purge_not_counted() {
        let mut metrics = RotationMetrics::new();
        metrics.record_purge(&purge(true));
        assert_eq!(metrics.total_deleted(), 0);
        assert_eq!(metrics.total_relocated(), 0);
    }

    #[test]
    fn test_reset() {
        let mut metrics = RotationMetrics::new();
        metrics.record_placement(&placement());
        metrics.record_rotated();
        metrics.record_failure();

        metrics.reset();

        assert_eq!(metrics.total_linked(), 0);
        assert_eq!(metrics.projects_rotated, 0);
        assert_eq!(metrics.projects_failed, 0);
    }

    #[test]
    fn test_summary() {
        let mut metrics = RotationMetrics::new();
        metrics.record_placement(&placement());
        metrics.record_purge(&purge(false));
        metrics.record_rotated();
        metrics.record_skipped();

        let summary = metrics.summary();
        assert!(summary.contains("Projects: 1 rotated, 1 skipped, 0 failed"));
        assert!(summary.contains("monthly: 1"));
        assert!(summary.contains("Relocated from:"));
    }
}

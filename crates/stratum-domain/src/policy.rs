//! Retention policy and per-run due decisions

use crate::Horizon;
use serde::{Deserialize, Serialize};

/// Keep-counts per horizon
///
/// A keep-count of 0 disables the horizon: it is never written to and never
/// purged.
///
/// # Examples
///
/// ```
/// use stratum_domain::{Horizon, KeepCounts};
///
/// let keep = KeepCounts::new(7, 4, 0);
/// assert!(keep.is_enabled(Horizon::Weekly));
/// assert!(!keep.is_enabled(Horizon::Monthly));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepCounts {
    /// Artifacts kept in `daily/`
    #[serde(default)]
    pub daily: u32,

    /// Artifacts kept in `weekly/`
    #[serde(default)]
    pub weekly: u32,

    /// Artifacts kept in `monthly/`
    #[serde(default)]
    pub monthly: u32,
}

impl KeepCounts {
    /// Create keep-counts for (daily, weekly, monthly)
    pub fn new(daily: u32, weekly: u32, monthly: u32) -> Self {
        Self {
            daily,
            weekly,
            monthly,
        }
    }

    /// Keep-count for a horizon
    pub fn get(&self, horizon: Horizon) -> u32 {
        match horizon {
            Horizon::Daily => self.daily,
            Horizon::Weekly => self.weekly,
            Horizon::Monthly => self.monthly,
        }
    }

    /// Whether a horizon is in service
    pub fn is_enabled(&self, horizon: Horizon) -> bool {
        self.get(horizon) > 0
    }

    /// Whether at least one horizon is in service
    pub fn any_enabled(&self) -> bool {
        Horizon::FASTEST_FIRST.iter().any(|h| self.is_enabled(*h))
    }
}

/// Result of due evaluation for one project and one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueSet {
    /// A new artifact belongs in `daily/`
    pub daily: bool,

    /// A new artifact belongs in `weekly/`
    pub weekly: bool,

    /// A new artifact belongs in `monthly/`
    pub monthly: bool,
}

impl DueSet {
    /// Whether a horizon is due
    pub fn is_due(&self, horizon: Horizon) -> bool {
        match horizon {
            Horizon::Daily => self.daily,
            Horizon::Weekly => self.weekly,
            Horizon::Monthly => self.monthly,
        }
    }

    /// Mark a horizon as due or not
    pub fn set(&mut self, horizon: Horizon, due: bool) {
        match horizon {
            Horizon::Daily => self.daily = due,
            Horizon::Weekly => self.weekly = due,
            Horizon::Monthly => self.monthly = due,
        }
    }

    /// Whether any horizon needs an artifact; producers skip work otherwise
    pub fn any(&self) -> bool {
        self.daily || self.weekly || self.monthly
    }

    /// Due horizons in placement order (slowest first)
    pub fn due_horizons(&self) -> Vec<Horizon> {
        Horizon::SLOWEST_FIRST
            .into_iter()
            .filter(|h| self.is_due(*h))
            .collect()
    }
}

//! Horizon module - the three retention buckets and their chain

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Retention horizon for backup artifacts
///
/// Each horizon owns one directory under a project root and keeps its own
/// number of artifacts:
/// - Daily: short-lived, rotates every run
/// - Weekly: medium-lived, rotates on the designated weekday
/// - Monthly: long-lived, rotates on the first day of the month
///
/// Horizons form a chain from slowest to fastest (Monthly → Weekly → Daily).
/// A faster horizon may hold a link pointing at a slower horizon's real file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    /// Short horizon (`daily/`)
    Daily,

    /// Medium horizon (`weekly/`)
    Weekly,

    /// Long horizon (`monthly/`)
    Monthly,
}

impl Horizon {
    /// Placement order: the real file lands in the first due horizon of this list
    pub const SLOWEST_FIRST: [Horizon; 3] = [Horizon::Monthly, Horizon::Weekly, Horizon::Daily];

    /// Purge order, and the order in which faster neighbours are searched
    pub const FASTEST_FIRST: [Horizon; 3] = [Horizon::Daily, Horizon::Weekly, Horizon::Monthly];

    /// Get the horizon name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::Daily => "daily",
            Horizon::Weekly => "weekly",
            Horizon::Monthly => "monthly",
        }
    }

    /// Directory name of this horizon inside a project root
    pub fn dir_name(&self) -> &'static str {
        self.as_str()
    }

    /// Parse a horizon from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "short" => Some(Horizon::Daily),
            "weekly" | "medium" => Some(Horizon::Weekly),
            "monthly" | "long" => Some(Horizon::Monthly),
            _ => None,
        }
    }

    /// The adjacent, faster-rotating horizon that may link into this one
    pub fn faster(&self) -> Option<Self> {
        match self {
            Horizon::Daily => None, // Fastest horizon
            Horizon::Weekly => Some(Horizon::Daily),
            Horizon::Monthly => Some(Horizon::Weekly),
        }
    }

    /// Faster horizons nearest first, the search path for referencing links
    pub fn faster_chain(&self) -> Vec<Horizon> {
        std::iter::successors(self.faster(), Horizon::faster).collect()
    }

    /// Calendar rule: whether this horizon rotates on `today`
    pub fn is_calendar_due(&self, today: NaiveDate, weekly_day: Weekday) -> bool {
        match self {
            Horizon::Daily => true,
            Horizon::Weekly => today.weekday() == weekly_day,
            Horizon::Monthly => today.day() == 1,
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid horizon: {}", s))
    }
}

//! Artifact identity recovered from dated file names
//!
//! There is no index on disk: an artifact is identified purely by a
//! `_YYYY-MM-DD.` token placed right before its extension, e.g.
//! `shop_2024-03-01.sql.gz`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static DATE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(\d{4}-\d{2}-\d{2})\.").expect("valid date token regex"));

/// Date format used inside artifact names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A dated backup artifact name
///
/// Equality and ordering follow the embedded date first, then the full file
/// name, so sorting a horizon's history yields oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    file_name: String,
    date: NaiveDate,
    token_start: usize,
}

impl ArtifactName {
    /// Build the canonical name `<stem>_<date>.<extension>`
    pub fn new(stem: &str, date: NaiveDate, extension: &str) -> Self {
        let file_name = format!(
            "{}_{}.{}",
            stem,
            date.format(DATE_FORMAT),
            extension.trim_start_matches('.')
        );
        Self {
            token_start: stem.len(),
            file_name,
            date,
        }
    }

    /// Recognise a dated artifact name
    ///
    /// Returns `None` for names without a `_YYYY-MM-DD.` token, or whose token
    /// is not a real calendar date. When several tokens appear the first one
    /// is the artifact date; stems never contain a dot, so anything later
    /// belongs to the extension.
    pub fn parse(file_name: &str) -> Option<Self> {
        let captures = DATE_TOKEN_RE.captures(file_name)?;
        let token = captures.get(1)?;
        let date = NaiveDate::parse_from_str(token.as_str(), DATE_FORMAT).ok()?;

        Some(Self {
            file_name: file_name.to_string(),
            date,
            // the match starts at the underscore
            token_start: token.start() - 1,
        })
    }

    /// Whether a file name follows the dated-artifact pattern
    pub fn matches(file_name: &str) -> bool {
        Self::parse(file_name).is_some()
    }

    /// The full file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The embedded date
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The logical name before the date token
    pub fn stem(&self) -> &str {
        &self.file_name[..self.token_start]
    }

    /// Everything after the date token's dot
    pub fn extension(&self) -> &str {
        // `_` + 10 date chars + `.`
        &self.file_name[self.token_start + 12..]
    }
}

impl Ord for ArtifactName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.file_name.cmp(&other.file_name))
    }
}

impl PartialOrd for ArtifactName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_name)
    }
}

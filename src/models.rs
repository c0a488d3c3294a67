// Core data structures for the suchna ingestion service

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stored text for a notice whose date could not be inferred
pub const UNKNOWN_DATE: &str = "Unknown";

const ISO_DATE: &str = "%Y-%m-%d";

/// Inferred publication date of a notice
///
/// Either a valid calendar date or the explicit `Unknown` sentinel; a
/// malformed date string is never representable. Ordering treats every
/// known date as later than `Unknown`, so "keep the later date" dedup
/// prefers a dated entry over an undated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoticeDate {
    Unknown,
    Known(NaiveDate),
}

impl NoticeDate {
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// The calendar date, if one was inferred
    #[must_use]
    pub fn as_known(&self) -> Option<NaiveDate> {
        match self {
            Self::Known(date) => Some(*date),
            Self::Unknown => None,
        }
    }
}

impl From<Option<NaiveDate>> for NoticeDate {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for NoticeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(date) => write!(f, "{}", date.format(ISO_DATE)),
            Self::Unknown => f.write_str(UNKNOWN_DATE),
        }
    }
}

impl FromStr for NoticeDate {
    type Err = Infallible;

    /// Parse the stored text form; anything that is not a valid ISO date
    /// degrades to `Unknown` rather than failing the caller.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(NaiveDate::parse_from_str(s, ISO_DATE)
            .map(Self::Known)
            .unwrap_or(Self::Unknown))
    }
}

impl Serialize for NoticeDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NoticeDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(text.parse().expect("infallible"))
    }
}

/// A raw title and link pair projected from one table row, prior to date
/// inference or identity resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: String,
    pub url: String,
    /// Document position; the source lists newest notices first
    pub source_order: usize,
}

/// An in-flight notice after date inference
///
/// Identity is the `(title, url)` pair; two notices sharing it are the same
/// real-world notice even when re-scraped with a different date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub url: String,
    pub date: NoticeDate,
}

impl Notice {
    /// Change-detection key; two entries with equal keys are byte-identical
    /// for diffing purposes
    #[must_use]
    pub fn composite_key(&self) -> String {
        composite_key(&self.date, &self.title, &self.url)
    }
}

/// A durable notice row as read back from storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredNotice {
    pub title: String,
    pub url: String,
    pub date: NoticeDate,
    pub created_at: DateTime<Utc>,
}

impl StoredNotice {
    #[must_use]
    pub fn composite_key(&self) -> String {
        composite_key(&self.date, &self.title, &self.url)
    }
}

fn composite_key(date: &NoticeDate, title: &str, url: &str) -> String {
    format!("{date}|{title}|{url}")
}

/// Outcome classification for a single ingestion run
///
/// Distinguishes "nothing new" from "the source broke" so the scheduler log
/// reflects which one happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run wrote (or attempted to write) a non-empty diff
    Ingested,
    /// The run completed but produced no new or changed notices
    NothingNew,
    /// The run could not complete; details are in the log
    Failed,
}

impl Default for RunOutcome {
    fn default() -> Self {
        Self::NothingNew
    }
}

/// Aggregate counts reported by one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows affected by the bulk upsert path; approximates creations since
    /// the bulk path cannot cheaply tell inserts from updates
    pub created: u64,
    pub updated: u64,
    /// Size of the diff set handed to persistence
    pub total: u64,
    pub outcome: RunOutcome,
}

impl IngestReport {
    /// A run that made no writes
    #[must_use]
    pub fn no_op(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NoticeDate {
        NoticeDate::Known(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_notice_date_display() {
        assert_eq!(date(2024, 7, 18).to_string(), "2024-07-18");
        assert_eq!(NoticeDate::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_notice_date_roundtrip() {
        let parsed: NoticeDate = "2024-07-18".parse().unwrap();
        assert_eq!(parsed, date(2024, 7, 18));
        assert_eq!(parsed.to_string(), "2024-07-18");

        let unknown: NoticeDate = "Unknown".parse().unwrap();
        assert_eq!(unknown, NoticeDate::Unknown);
    }

    #[test]
    fn test_malformed_date_degrades_to_unknown() {
        let parsed: NoticeDate = "18/07/2024".parse().unwrap();
        assert_eq!(parsed, NoticeDate::Unknown);

        let parsed: NoticeDate = "2024-13-40".parse().unwrap();
        assert_eq!(parsed, NoticeDate::Unknown);
    }

    #[test]
    fn test_known_dates_order_by_calendar() {
        assert!(date(2024, 7, 20) > date(2024, 7, 18));
        assert!(date(2025, 1, 1) > date(2024, 12, 31));
    }

    #[test]
    fn test_known_beats_unknown() {
        assert!(date(2018, 1, 1) > NoticeDate::Unknown);
    }

    #[test]
    fn test_composite_key() {
        let notice = Notice {
            title: "Exam notice".to_string(),
            url: "http://example.com/nt.pdf".to_string(),
            date: date(2024, 7, 18),
        };
        assert_eq!(
            notice.composite_key(),
            "2024-07-18|Exam notice|http://example.com/nt.pdf"
        );
    }

    #[test]
    fn test_no_op_report() {
        let report = IngestReport::no_op(RunOutcome::Failed);
        assert_eq!(report.created, 0);
        assert_eq!(report.total, 0);
        assert_eq!(report.outcome, RunOutcome::Failed);
    }
}

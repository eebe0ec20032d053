//! Core data model types for examtrack.
//!
//! These are the fundamental types the entire system uses to represent
//! subjects, study sessions, and self-test results. Raw rows coming from
//! persistence or imports are repaired into these shapes by the
//! [`crate::normalize`] module; once constructed, every value here is
//! within its documented range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Suggested task labels for study sessions. `LogEntry::task` stays a free
/// label; these are only offered as choices by front-ends.
pub const TASK_TYPES: [&str; 5] = ["Read", "Problems", "Past paper", "Teaching", "Flashcards"];

/// A course or topic the user is tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Opaque unique identifier, stable for the subject's lifetime.
    pub id: String,
    /// Display label, not required to be unique.
    #[serde(default)]
    pub name: String,
    /// Positive weight representing subject importance. Always >= 1.
    pub credits: u32,
    /// Self-reported mastery in 0..=10.
    pub confidence: u8,
    /// Exam date; `None` falls back to the configured default at metrics time.
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
    /// Identifier of the user who owns this row (empty = unclaimed/legacy).
    #[serde(default, alias = "user_id")]
    pub owner: String,
}

/// One recorded study session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Soft reference into [`Subject::id`]; orphaned rows are excluded from
    /// aggregation by virtue of grouping.
    #[serde(default)]
    pub subject_id: String,
    /// Non-negative session length in hours.
    pub hours: f64,
    /// Free task label, see [`TASK_TYPES`] for suggestions.
    #[serde(default)]
    pub task: String,
    /// Optional quick self-rating in 0..=100. Out-of-range input is dropped
    /// to `None` at normalization time, not clamped.
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, alias = "user_id")]
    pub owner: String,
}

/// One self-administered test result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEntry {
    pub id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub subject_id: String,
    /// Score in 0..=100. Out-of-range input is clamped at normalization
    /// time (asymmetric with [`LogEntry::score`] on purpose).
    #[serde(default)]
    pub score: Option<u8>,
    /// Perceived difficulty in 1..=5.
    pub difficulty: u8,
    #[serde(default)]
    pub notes: String,
    #[serde(default, alias = "user_id")]
    pub owner: String,
}

/// Minimal user row for leaderboard display. Authentication is not this
/// crate's concern; only identity and display name matter here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// Explicit configuration for the metrics engine. Always passed in by the
/// caller; there is no ambient settings state anywhere in this crate.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Weight of the study-log score mean in the blended average, in [0, 1].
    pub logs_weight: f64,
    /// Weight of the test score mean. When `None`, derived as
    /// `max(0, 1 - logs_weight)`. A supplied value wins even if the pair
    /// does not sum to 1.
    pub tests_weight: Option<f64>,
    /// Fallback exam date for subjects without one of their own.
    pub default_exam_date: NaiveDate,
}

impl MetricsConfig {
    /// Resolved `(logs_weight, tests_weight)` pair, each clamped into [0, 1].
    pub fn weights(&self) -> (f64, f64) {
        let w_logs = self.logs_weight.clamp(0.0, 1.0);
        let w_tests = self
            .tests_weight
            .unwrap_or((1.0 - w_logs).max(0.0))
            .clamp(0.0, 1.0);
        (w_logs, w_tests)
    }
}

/// Common accessors for owned, identified rows. Lets the tenancy helpers
/// split and merge any entity collection generically.
pub trait Record {
    fn id(&self) -> &str;
    fn owner(&self) -> &str;
    fn set_owner(&mut self, owner: &str);
}

macro_rules! impl_record {
    ($ty:ty) => {
        impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn owner(&self) -> &str {
                &self.owner
            }
            fn set_owner(&mut self, owner: &str) {
                self.owner = owner.to_string();
            }
        }
    };
}

impl_record!(Subject);
impl_record!(LogEntry);
impl_record!(TestEntry);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_serde_roundtrip() {
        let subject = Subject {
            id: "org-synthesis".into(),
            name: "Organic synthesis".into(),
            credits: 2,
            confidence: 2,
            exam_date: NaiveDate::from_ymd_opt(2025, 9, 5),
            owner: "u1".into(),
        };
        let json = serde_json::to_string(&subject).unwrap();
        let back: Subject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subject);
        assert!(json.contains("2025-09-05"));
    }

    #[test]
    fn legacy_user_id_column_accepted() {
        let json = r#"{"id":"l1","hours":1.5,"user_id":"u9"}"#;
        let log: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(log.owner, "u9");
        assert_eq!(log.score, None);
        assert!(log.date.is_none());
    }

    #[test]
    fn weights_derive_tests_share() {
        let config = MetricsConfig {
            logs_weight: 0.7,
            tests_weight: None,
            default_exam_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
        };
        let (w_logs, w_tests) = config.weights();
        assert!((w_logs - 0.7).abs() < f64::EPSILON);
        assert!((w_tests - 0.3).abs() < 1e-9);
    }

    #[test]
    fn weights_honor_supplied_tests_share() {
        let config = MetricsConfig {
            logs_weight: 0.7,
            tests_weight: Some(0.5),
            default_exam_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
        };
        assert_eq!(config.weights(), (0.7, 0.5));
    }

    #[test]
    fn weights_clamp_out_of_range() {
        let config = MetricsConfig {
            logs_weight: 1.4,
            tests_weight: None,
            default_exam_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
        };
        assert_eq!(config.weights(), (1.0, 0.0));
    }

    #[test]
    fn record_owner_accessors() {
        let mut subject = Subject {
            id: "s1".into(),
            name: String::new(),
            credits: 1,
            confidence: 5,
            exam_date: None,
            owner: String::new(),
        };
        assert_eq!(subject.id(), "s1");
        subject.set_owner("u1");
        assert_eq!(subject.owner(), "u1");
    }
}

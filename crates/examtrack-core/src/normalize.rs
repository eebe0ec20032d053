//! Row normalization and the field-level repair policy.
//!
//! Persistence layers and importers hand rows over as [`RawSubject`],
//! [`RawLog`], and [`RawTest`], where every field is an optional string.
//! This module repairs them into the typed entities of [`crate::model`].
//! Malformed input never errors: fields are clamped, defaulted, or nulled
//! per the policy below, and processing continues.
//!
//! Repair policy:
//! - blank or missing `id` → fresh UUID v4
//! - `credits`: unparseable → 1, floored at 1
//! - `confidence`: unparseable → 5, rounded, clamped into 0..=10
//! - `hours`: unparseable → 0.0, floored at 0.0
//! - log `score`: out of 0..=100 → dropped to `None`
//! - test `score`: out of 0..=100 → clamped
//! - test `difficulty`: unparseable → 3, rounded, clamped into 1..=5
//! - dates: unparseable → `None`
//!
//! The log-drop / test-clamp asymmetry for scores is intentional and load
//! bearing: tests downstream pin it.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::model::{LogEntry, Subject, TestEntry};

const DEFAULT_CREDITS: u32 = 1;
const DEFAULT_CONFIDENCE: u8 = 5;
const DEFAULT_DIFFICULTY: u8 = 3;

/// A subject row as it appears on disk or in an import file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawSubject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub credits: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default, alias = "user_id")]
    pub owner: Option<String>,
}

/// A study-session row as it appears on disk or in an import file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawLog {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "user_id")]
    pub owner: Option<String>,
}

/// A self-test row as it appears on disk or in an import file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawTest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "user_id")]
    pub owner: Option<String>,
}

/// Lenient date parsing: ISO date, slash-separated date, or the date part
/// of an ISO datetime. Anything else is treated as missing.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Strip a time component ("2025-09-05T10:00:00" or "2025-09-05 10:00").
    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y/%m/%d"))
        .ok()
}

fn parse_number(input: Option<&String>) -> Option<f64> {
    input
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn clean_string(input: Option<String>) -> String {
    input.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn ensure_id(input: Option<String>) -> String {
    let id = clean_string(input);
    if id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        id
    }
}

fn resolve_owner(row_owner: Option<String>, forced: Option<&str>) -> String {
    match forced {
        Some(owner) => owner.to_string(),
        None => clean_string(row_owner),
    }
}

/// Repair a raw subject row. `owner`, when given, overrides the row's own.
pub fn normalize_subject(raw: RawSubject, owner: Option<&str>) -> Subject {
    let credits = parse_number(raw.credits.as_ref())
        .map(|v| v.round().max(DEFAULT_CREDITS as f64) as u32)
        .unwrap_or(DEFAULT_CREDITS);
    let confidence = parse_number(raw.confidence.as_ref())
        .map(|v| v.round().clamp(0.0, 10.0) as u8)
        .unwrap_or(DEFAULT_CONFIDENCE);
    Subject {
        id: ensure_id(raw.id),
        name: clean_string(raw.name),
        credits,
        confidence,
        exam_date: raw.exam_date.as_deref().and_then(parse_date),
        owner: resolve_owner(raw.owner, owner),
    }
}

/// Repair a raw study-session row.
pub fn normalize_log(raw: RawLog, owner: Option<&str>) -> LogEntry {
    let score = parse_number(raw.score.as_ref()).and_then(|v| {
        let rounded = v.round();
        if (0.0..=100.0).contains(&rounded) {
            Some(rounded as u8)
        } else {
            tracing::debug!(score = v, "dropping out-of-range log score");
            None
        }
    });
    LogEntry {
        id: ensure_id(raw.id),
        date: raw.date.as_deref().and_then(parse_date),
        subject_id: clean_string(raw.subject_id),
        hours: parse_number(raw.hours.as_ref()).unwrap_or(0.0).max(0.0),
        task: clean_string(raw.task),
        score,
        notes: clean_string(raw.notes),
        owner: resolve_owner(raw.owner, owner),
    }
}

/// Repair a raw self-test row.
pub fn normalize_test(raw: RawTest, owner: Option<&str>) -> TestEntry {
    let score = parse_number(raw.score.as_ref()).map(|v| v.round().clamp(0.0, 100.0) as u8);
    let difficulty = parse_number(raw.difficulty.as_ref())
        .map(|v| v.round().clamp(1.0, 5.0) as u8)
        .unwrap_or(DEFAULT_DIFFICULTY);
    TestEntry {
        id: ensure_id(raw.id),
        date: raw.date.as_deref().and_then(parse_date),
        subject_id: clean_string(raw.subject_id),
        score,
        difficulty,
        notes: clean_string(raw.notes),
        owner: resolve_owner(raw.owner, owner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_subject(fields: &[(&str, &str)]) -> RawSubject {
        let mut raw = RawSubject::default();
        for (key, value) in fields {
            let value = Some(value.to_string());
            match *key {
                "id" => raw.id = value,
                "name" => raw.name = value,
                "credits" => raw.credits = value,
                "confidence" => raw.confidence = value,
                "exam_date" => raw.exam_date = value,
                "owner" => raw.owner = value,
                other => panic!("unknown field {other}"),
            }
        }
        raw
    }

    #[test]
    fn blank_id_gets_uuid() {
        let subject = normalize_subject(raw_subject(&[("id", "  ")]), None);
        assert!(!subject.id.is_empty());
        assert!(Uuid::parse_str(&subject.id).is_ok());
    }

    #[test]
    fn existing_id_kept() {
        let subject = normalize_subject(raw_subject(&[("id", "org-synthesis")]), None);
        assert_eq!(subject.id, "org-synthesis");
    }

    #[test]
    fn credits_floor_and_default() {
        assert_eq!(
            normalize_subject(raw_subject(&[("credits", "0")]), None).credits,
            1
        );
        assert_eq!(
            normalize_subject(raw_subject(&[("credits", "nope")]), None).credits,
            1
        );
        assert_eq!(
            normalize_subject(raw_subject(&[("credits", "3.0")]), None).credits,
            3
        );
    }

    #[test]
    fn confidence_clamped_not_rejected() {
        assert_eq!(
            normalize_subject(raw_subject(&[("confidence", "14")]), None).confidence,
            10
        );
        assert_eq!(
            normalize_subject(raw_subject(&[("confidence", "-3")]), None).confidence,
            0
        );
        assert_eq!(normalize_subject(RawSubject::default(), None).confidence, 5);
    }

    #[test]
    fn exam_date_lenient_parse() {
        let parsed = normalize_subject(raw_subject(&[("exam_date", "2025-09-05T00:00:00")]), None);
        assert_eq!(parsed.exam_date, NaiveDate::from_ymd_opt(2025, 9, 5));
        let garbage = normalize_subject(raw_subject(&[("exam_date", "soon")]), None);
        assert_eq!(garbage.exam_date, None);
    }

    #[test]
    fn log_score_out_of_range_is_dropped() {
        let raw = RawLog {
            score: Some("150".into()),
            ..RawLog::default()
        };
        assert_eq!(normalize_log(raw, None).score, None);

        let raw = RawLog {
            score: Some("80".into()),
            ..RawLog::default()
        };
        assert_eq!(normalize_log(raw, None).score, Some(80));
    }

    #[test]
    fn test_score_out_of_range_is_clamped() {
        let raw = RawTest {
            score: Some("150".into()),
            ..RawTest::default()
        };
        assert_eq!(normalize_test(raw, None).score, Some(100));

        let raw = RawTest {
            score: Some("-5".into()),
            ..RawTest::default()
        };
        assert_eq!(normalize_test(raw, None).score, Some(0));
    }

    #[test]
    fn missing_test_score_stays_missing() {
        assert_eq!(normalize_test(RawTest::default(), None).score, None);
    }

    #[test]
    fn difficulty_default_and_clamp() {
        assert_eq!(normalize_test(RawTest::default(), None).difficulty, 3);
        let raw = RawTest {
            difficulty: Some("9".into()),
            ..RawTest::default()
        };
        assert_eq!(normalize_test(raw, None).difficulty, 5);
    }

    #[test]
    fn hours_never_negative() {
        let raw = RawLog {
            hours: Some("-2.5".into()),
            ..RawLog::default()
        };
        assert_eq!(normalize_log(raw, None).hours, 0.0);
    }

    #[test]
    fn forced_owner_wins() {
        let raw = RawLog {
            owner: Some("someone-else".into()),
            ..RawLog::default()
        };
        assert_eq!(normalize_log(raw, Some("u1")).owner, "u1");
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2025-09-05"), NaiveDate::from_ymd_opt(2025, 9, 5));
        assert_eq!(parse_date("2025/09/05"), NaiveDate::from_ymd_opt(2025, 9, 5));
        assert_eq!(
            parse_date("2025-09-05 10:30:00"),
            NaiveDate::from_ymd_opt(2025, 9, 5)
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("05.09.2025"), None);
    }
}

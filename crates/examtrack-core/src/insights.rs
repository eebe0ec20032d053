//! Dashboard analytics derived from the entity collections.
//!
//! Everything here is presentation-agnostic: rankings, time series, and
//! highlight extraction that front-ends render as tables or charts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::metrics::SubjectMetrics;
use crate::model::{LogEntry, TestEntry};

/// A session at least this long counts as a highlight.
const LONG_SESSION_HOURS: f64 = 2.0;
/// A test score at least this high counts as a highlight.
const HIGH_SCORE: u8 = 80;

/// The top `n` subjects by priority gap, most urgent first.
pub fn top_focus(metrics: &[SubjectMetrics], n: usize) -> Vec<&SubjectMetrics> {
    let mut ranked: Vec<&SubjectMetrics> = metrics.iter().collect();
    ranked.sort_by(|a, b| b.priority_gap.total_cmp(&a.priority_gap));
    ranked.truncate(n);
    ranked
}

/// Subjects ordered by how soon their exam is, ties broken by priority gap.
pub fn upcoming_exams(metrics: &[SubjectMetrics]) -> Vec<&SubjectMetrics> {
    let mut ordered: Vec<&SubjectMetrics> = metrics.iter().collect();
    ordered.sort_by(|a, b| {
        a.days_left
            .cmp(&b.days_left)
            .then(a.priority_gap.total_cmp(&b.priority_gap))
    });
    ordered
}

/// Study momentum: total hours per active day within the trailing window.
/// Days without any logged session are absent from the result.
pub fn daily_hours(logs: &[LogEntry], window_days: u32, today: NaiveDate) -> Vec<(NaiveDate, f64)> {
    let cutoff = today - Duration::days(i64::from(window_days.saturating_sub(1)));
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for log in logs {
        if let Some(date) = log.date {
            if date >= cutoff {
                *by_day.entry(date).or_default() += log.hours;
            }
        }
    }
    by_day.into_iter().collect()
}

/// Knowledge curve: mean test score per test date, oldest first. Undated
/// and scoreless tests are skipped.
pub fn score_curve(tests: &[TestEntry]) -> Vec<(NaiveDate, f64)> {
    let mut by_day: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for test in tests {
        if let (Some(date), Some(score)) = (test.date, test.score) {
            let entry = by_day.entry(date).or_default();
            entry.0 += f64::from(score);
            entry.1 += 1;
        }
    }
    by_day
        .into_iter()
        .map(|(date, (sum, count))| (date, sum / f64::from(count)))
        .collect()
}

/// The latest `n` study sessions, newest first. Undated rows sort last.
pub fn recent_logs(logs: &[LogEntry], n: usize) -> Vec<&LogEntry> {
    let mut ordered: Vec<&LogEntry> = logs.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered.truncate(n);
    ordered
}

/// What kind of activity a highlight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Study,
    Test,
}

impl fmt::Display for HighlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightKind::Study => write!(f, "study"),
            HighlightKind::Test => write!(f, "test"),
        }
    }
}

/// A notable recent event: a long session or a high test score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub when: NaiveDate,
    pub owner: String,
    pub kind: HighlightKind,
    pub detail: String,
}

/// Long sessions and high scores within the trailing window, newest first.
pub fn recent_highlights(
    logs: &[LogEntry],
    tests: &[TestEntry],
    window_days: u32,
    today: NaiveDate,
) -> Vec<Highlight> {
    let cutoff = today - Duration::days(i64::from(window_days.saturating_sub(1)));
    let mut items = Vec::new();

    for log in logs {
        if let Some(date) = log.date {
            if date >= cutoff && log.hours >= LONG_SESSION_HOURS {
                items.push(Highlight {
                    when: date,
                    owner: log.owner.clone(),
                    kind: HighlightKind::Study,
                    detail: format!("{:.1}h session", log.hours),
                });
            }
        }
    }

    for test in tests {
        if let (Some(date), Some(score)) = (test.date, test.score) {
            if date >= cutoff && score >= HIGH_SCORE {
                items.push(Highlight {
                    when: date,
                    owner: test.owner.clone(),
                    kind: HighlightKind::Test,
                    detail: format!("Scored {score}%"),
                });
            }
        }
    }

    items.sort_by(|a, b| b.when.cmp(&a.when));
    items
}

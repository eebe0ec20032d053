//! Per-subject priority metrics and the portfolio readiness score.
//!
//! Pure functions over already-filtered entity collections: same inputs,
//! same outputs, no clock reads, no I/O. Callers pass `today` explicitly
//! so results are replayable.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{LogEntry, MetricsConfig, Subject, TestEntry};

/// Derived metrics for one subject. Computed fresh on every query, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMetrics {
    pub subject_id: String,
    pub name: String,
    pub credits: u32,
    pub confidence: u8,
    /// Effective exam date: the subject's own, else the configured default.
    pub exam_date: NaiveDate,
    /// `(10 - confidence) * credits`. Higher when confidence is low and
    /// credits are high.
    pub priority: f64,
    /// Total study hours logged for this subject.
    pub hours: f64,
    /// Mean of log scores, `None` when no log carries a score.
    pub logs_avg: Option<f64>,
    /// Mean of test scores, `None` when no test carries a score.
    pub tests_avg: Option<f64>,
    /// Weighted blend of the two means (either one alone when the other is
    /// missing, 0 when both are).
    pub avg_score: f64,
    /// Whole days until the effective exam date, never negative.
    pub days_left: u32,
    /// `priority * (1 - avg_score/100)`, the ranking key for what to
    /// study next.
    pub priority_gap: f64,
}

/// Subject importance weight derived from credits and inverse confidence.
pub fn calc_priority(credits: u32, confidence: u8) -> f64 {
    (10.0 - f64::from(confidence)) * f64::from(credits)
}

/// Mean accumulator keyed by subject id. Scoreless rows never reach it, so
/// a present entry always has a positive count.
#[derive(Default)]
struct MeanAcc {
    sum: f64,
    count: u32,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / f64::from(self.count)
    }
}

/// Compute per-subject metrics from the three entity collections.
///
/// Every subject appears in the output exactly once, zero-filled when it
/// has no logs or tests. Log and test rows referencing unknown subject ids
/// are dropped by the join.
pub fn compute_metrics(
    subjects: &[Subject],
    logs: &[LogEntry],
    tests: &[TestEntry],
    config: &MetricsConfig,
    today: NaiveDate,
) -> Vec<SubjectMetrics> {
    let (w_logs, w_tests) = config.weights();

    let mut hours_by_subject: HashMap<&str, f64> = HashMap::new();
    let mut log_scores: HashMap<&str, MeanAcc> = HashMap::new();
    for log in logs {
        *hours_by_subject.entry(log.subject_id.as_str()).or_default() += log.hours;
        if let Some(score) = log.score {
            log_scores
                .entry(log.subject_id.as_str())
                .or_default()
                .push(f64::from(score));
        }
    }

    let mut test_scores: HashMap<&str, MeanAcc> = HashMap::new();
    for test in tests {
        if let Some(score) = test.score {
            test_scores
                .entry(test.subject_id.as_str())
                .or_default()
                .push(f64::from(score));
        }
    }

    subjects
        .iter()
        .map(|subject| {
            let priority = calc_priority(subject.credits, subject.confidence);
            let hours = hours_by_subject
                .get(subject.id.as_str())
                .copied()
                .unwrap_or(0.0);
            let logs_avg = log_scores.get(subject.id.as_str()).map(MeanAcc::mean);
            let tests_avg = test_scores.get(subject.id.as_str()).map(MeanAcc::mean);

            let avg_score = match (logs_avg, tests_avg) {
                (Some(logs), Some(tests)) => logs * w_logs + tests * w_tests,
                (Some(logs), None) => logs,
                (None, Some(tests)) => tests,
                (None, None) => 0.0,
            };

            let exam_date = subject.exam_date.unwrap_or(config.default_exam_date);
            let days_left = (exam_date - today).num_days().max(0) as u32;
            let priority_gap = priority * (1.0 - avg_score / 100.0);

            SubjectMetrics {
                subject_id: subject.id.clone(),
                name: subject.name.clone(),
                credits: subject.credits,
                confidence: subject.confidence,
                exam_date,
                priority,
                hours,
                logs_avg,
                tests_avg,
                avg_score,
                days_left,
                priority_gap,
            }
        })
        .collect()
}

/// Portfolio-level readiness in [0, 1]: the priority-weighted average of
/// per-subject mastery. Returns 0.0 for an empty portfolio or when every
/// priority is zero.
pub fn weighted_readiness(metrics: &[SubjectMetrics]) -> f64 {
    let denominator: f64 = metrics.iter().map(|m| m.priority).sum();
    if denominator == 0.0 {
        return 0.0;
    }
    let numerator: f64 = metrics
        .iter()
        .map(|m| m.priority * m.avg_score / 100.0)
        .sum();
    numerator / denominator
}

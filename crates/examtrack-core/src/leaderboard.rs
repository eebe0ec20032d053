//! Cross-user leaderboard and study-streak scoring.
//!
//! Scoring:
//!   +10 pts per study hour
//!   +2 pts per test % (average)
//!   +2 * difficulty per test entry
//!   +2 pts per day in the current streak, +1 per day in the best streak

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{LogEntry, TestEntry, UserProfile};

/// Longest run of consecutive days with any activity.
pub fn longest_streak(days: &[NaiveDate]) -> u32 {
    let unique: BTreeSet<NaiveDate> = days.iter().copied().collect();
    let mut longest = 0u32;
    let mut current = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for day in unique {
        current = match previous {
            Some(prev) if day - prev == Duration::days(1) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(day);
    }
    longest
}

/// Ongoing run of consecutive active days ending today.
pub fn current_streak(days: &[NaiveDate], today: NaiveDate) -> u32 {
    let unique: HashSet<NaiveDate> = days.iter().copied().collect();
    let mut streak = 0u32;
    let mut day = today;
    while unique.contains(&day) {
        streak += 1;
        day = day - Duration::days(1);
    }
    streak
}

/// One ranked leaderboard entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub user_id: String,
    pub username: String,
    pub score: f64,
    pub hours: f64,
    pub tests_avg: f64,
    pub streak_current: u32,
    pub streak_best: u32,
}

/// Rank all users by their activity. Every user gets a row, inactive ones
/// score zero.
pub fn compute_leaderboard(
    logs: &[LogEntry],
    tests: &[TestEntry],
    users: &[UserProfile],
    today: NaiveDate,
) -> Vec<LeaderboardRow> {
    let mut hours_by: HashMap<&str, f64> = HashMap::new();
    let mut dates_by: HashMap<&str, Vec<NaiveDate>> = HashMap::new();
    for log in logs {
        *hours_by.entry(log.owner.as_str()).or_default() += log.hours;
        if let Some(date) = log.date {
            dates_by.entry(log.owner.as_str()).or_default().push(date);
        }
    }

    let mut score_sums: HashMap<&str, (f64, u32)> = HashMap::new();
    let mut difficulty_by: HashMap<&str, u32> = HashMap::new();
    for test in tests {
        if let Some(score) = test.score {
            let entry = score_sums.entry(test.owner.as_str()).or_default();
            entry.0 += f64::from(score);
            entry.1 += 1;
        }
        *difficulty_by.entry(test.owner.as_str()).or_default() += u32::from(test.difficulty);
    }

    let mut rows: Vec<LeaderboardRow> = users
        .iter()
        .map(|user| {
            let uid = user.id.as_str();
            let hours = hours_by.get(uid).copied().unwrap_or(0.0);
            let tests_avg = score_sums
                .get(uid)
                .map(|(sum, count)| sum / f64::from(*count))
                .unwrap_or(0.0);
            let test_bonus = f64::from(difficulty_by.get(uid).copied().unwrap_or(0)) * 2.0;
            let empty = Vec::new();
            let dates = dates_by.get(uid).unwrap_or(&empty);
            let streak_current = current_streak(dates, today);
            let streak_best = longest_streak(dates);

            let score = hours * 10.0
                + tests_avg * 2.0
                + test_bonus
                + f64::from(streak_current) * 2.0
                + f64::from(streak_best);

            LeaderboardRow {
                rank: 0,
                user_id: user.id.clone(),
                username: user.username.clone(),
                score,
                hours,
                tests_avg,
                streak_current,
                streak_best,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(b.hours.total_cmp(&a.hours))
            .then(b.tests_avg.total_cmp(&a.tests_avg))
    });
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log_for(owner: &str, day: NaiveDate, hours: f64) -> LogEntry {
        LogEntry {
            id: format!("{owner}-{day}"),
            date: Some(day),
            subject_id: "s".into(),
            hours,
            task: String::new(),
            score: None,
            notes: String::new(),
            owner: owner.into(),
        }
    }

    fn test_for(owner: &str, score: Option<u8>, difficulty: u8) -> TestEntry {
        TestEntry {
            id: format!("{owner}-test"),
            date: None,
            subject_id: "s".into(),
            score,
            difficulty,
            notes: String::new(),
            owner: owner.into(),
        }
    }

    fn user(id: &str) -> UserProfile {
        UserProfile {
            id: id.into(),
            username: id.to_uppercase(),
        }
    }

    #[test]
    fn longest_streak_spans_consecutive_days() {
        let days = vec![
            date(2025, 8, 1),
            date(2025, 8, 2),
            date(2025, 8, 2), // duplicate day counts once
            date(2025, 8, 3),
            date(2025, 8, 6),
            date(2025, 8, 7),
        ];
        assert_eq!(longest_streak(&days), 3);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn current_streak_must_reach_today() {
        let today = date(2025, 8, 7);
        let days = vec![date(2025, 8, 5), date(2025, 8, 6), date(2025, 8, 7)];
        assert_eq!(current_streak(&days, today), 3);

        let stale = vec![date(2025, 8, 5), date(2025, 8, 6)];
        assert_eq!(current_streak(&stale, today), 0);
    }

    #[test]
    fn leaderboard_score_formula() {
        let today = date(2025, 8, 7);
        let logs = vec![
            log_for("u1", date(2025, 8, 6), 2.0),
            log_for("u1", date(2025, 8, 7), 1.0),
        ];
        let tests = vec![test_for("u1", Some(80), 4)];
        let rows = compute_leaderboard(&logs, &tests, &[user("u1")], today);
        let row = &rows[0];
        assert_eq!(row.streak_current, 2);
        assert_eq!(row.streak_best, 2);
        // 3h*10 + 80*2 + 4*2 + 2*2 + 2*1
        assert!((row.score - (30.0 + 160.0 + 8.0 + 4.0 + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn scoreless_tests_still_earn_difficulty_bonus() {
        let rows = compute_leaderboard(
            &[],
            &[test_for("u1", None, 5)],
            &[user("u1")],
            date(2025, 8, 7),
        );
        assert_eq!(rows[0].tests_avg, 0.0);
        assert!((rows[0].score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn every_user_gets_a_rank() {
        let today = date(2025, 8, 7);
        let logs = vec![log_for("busy", date(2025, 8, 7), 5.0)];
        let rows = compute_leaderboard(&logs, &[], &[user("idle"), user("busy")], today);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_id, "busy");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].user_id, "idle");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].score, 0.0);
    }
}

//! The `examtrack log` subcommands.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Table};

use examtrack_core::insights::recent_logs;
use examtrack_core::normalize::{normalize_log, RawLog};
use examtrack_core::tenancy::split_by_owner;

use super::open_store;

#[allow(clippy::too_many_arguments)]
pub fn add(
    subject: String,
    hours: f64,
    task: String,
    score: Option<u8>,
    notes: String,
    date: Option<NaiveDate>,
    owner: Option<String>,
) -> Result<()> {
    anyhow::ensure!(hours >= 0.0, "hours must be non-negative");
    let store = open_store()?;
    if !store.load_subjects()?.iter().any(|s| s.id == subject) {
        eprintln!("Note: no subject with id '{subject}'; the session will not count toward metrics until one exists.");
    }

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let raw = RawLog {
        id: None,
        date: Some(date.to_string()),
        subject_id: Some(subject),
        hours: Some(hours.to_string()),
        task: Some(task),
        score: score.map(|s| s.to_string()),
        notes: Some(notes),
        owner,
    };
    let entry = normalize_log(raw, None);
    store.add_log(entry.clone())?;
    println!("Logged {:.1}h on {} ({})", entry.hours, entry.subject_id, entry.id);
    Ok(())
}

pub fn list(limit: usize, owner: Option<String>) -> Result<()> {
    let store = open_store()?;
    let mut logs = store.load_logs()?;
    if let Some(owner) = &owner {
        logs = split_by_owner(&logs, owner).0;
    }
    let recent = recent_logs(&logs, limit);
    if recent.is_empty() {
        println!("No study sessions yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Subject", "Task", "Hours", "Score", "Notes"]);
    for log in recent {
        let date = log
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(undated)".to_string());
        let score = log
            .score
            .map(|s| format!("{s}%"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(date),
            Cell::new(&log.subject_id),
            Cell::new(&log.task),
            Cell::new(format!("{:.1}", log.hours)),
            Cell::new(score),
            Cell::new(&log.notes),
        ]);
    }
    println!("{table}");
    Ok(())
}

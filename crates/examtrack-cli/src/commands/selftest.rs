//! The `examtrack test` subcommands.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Table};

use examtrack_core::normalize::{normalize_test, RawTest};
use examtrack_core::tenancy::split_by_owner;

use super::open_store;

pub fn add(
    subject: String,
    score: u8,
    difficulty: u8,
    notes: String,
    date: Option<NaiveDate>,
    owner: Option<String>,
) -> Result<()> {
    let store = open_store()?;
    if !store.load_subjects()?.iter().any(|s| s.id == subject) {
        eprintln!("Note: no subject with id '{subject}'; the test will not count toward metrics until one exists.");
    }

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let raw = RawTest {
        id: None,
        date: Some(date.to_string()),
        subject_id: Some(subject),
        score: Some(score.to_string()),
        difficulty: Some(difficulty.to_string()),
        notes: Some(notes),
        owner,
    };
    let entry = normalize_test(raw, None);
    store.add_test(entry.clone())?;
    let shown = entry.score.unwrap_or(0);
    println!("Recorded {shown}% on {} ({})", entry.subject_id, entry.id);
    Ok(())
}

pub fn list(limit: usize, owner: Option<String>) -> Result<()> {
    let store = open_store()?;
    let mut tests = store.load_tests()?;
    if let Some(owner) = &owner {
        tests = split_by_owner(&tests, owner).0;
    }
    if tests.is_empty() {
        println!("No self-tests yet.");
        return Ok(());
    }

    tests.sort_by(|a, b| b.date.cmp(&a.date));
    tests.truncate(limit);

    let mut table = Table::new();
    table.set_header(vec!["Date", "Subject", "Score", "Difficulty", "Notes"]);
    for test in &tests {
        let date = test
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(undated)".to_string());
        let score = test
            .score
            .map(|s| format!("{s}%"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(date),
            Cell::new(&test.subject_id),
            Cell::new(score),
            Cell::new(test.difficulty),
            Cell::new(&test.notes),
        ]);
    }
    println!("{table}");
    Ok(())
}

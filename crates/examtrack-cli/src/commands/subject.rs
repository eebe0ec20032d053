//! The `examtrack subject` subcommands.

use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, Table};

use examtrack_core::normalize::{normalize_subject, RawSubject};
use examtrack_core::tenancy::split_by_owner;

use super::open_store;

pub fn list(owner: Option<String>) -> Result<()> {
    let store = open_store()?;
    let mut subjects = store.load_subjects()?;
    if let Some(owner) = &owner {
        subjects = split_by_owner(&subjects, owner).0;
    }
    if subjects.is_empty() {
        println!("No subjects yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Credits", "Confidence", "Exam date", "Owner"]);
    for subject in &subjects {
        let exam = subject
            .exam_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(default)".to_string());
        table.add_row(vec![
            Cell::new(&subject.id),
            Cell::new(&subject.name),
            Cell::new(subject.credits),
            Cell::new(subject.confidence),
            Cell::new(exam),
            Cell::new(&subject.owner),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn add(
    name: String,
    credits: u32,
    confidence: u8,
    exam_date: Option<NaiveDate>,
    id: Option<String>,
    owner: Option<String>,
) -> Result<()> {
    anyhow::ensure!(credits >= 1, "credits must be at least 1");
    let store = open_store()?;
    let raw = RawSubject {
        id,
        name: Some(name),
        credits: Some(credits.to_string()),
        confidence: Some(confidence.to_string()),
        exam_date: exam_date.map(|d| d.to_string()),
        owner,
    };
    let subject = normalize_subject(raw, None);
    store.add_subject(subject.clone())?;
    println!("Added subject {} ({})", subject.name, subject.id);
    Ok(())
}

pub fn remove(id: String) -> Result<()> {
    let store = open_store()?;
    if store.remove_subject(&id)? {
        println!("Removed subject {id}");
        Ok(())
    } else {
        anyhow::bail!("no subject with id '{id}'")
    }
}

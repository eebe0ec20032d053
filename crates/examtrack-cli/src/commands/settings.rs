//! The `examtrack settings` subcommands.

use anyhow::Result;
use chrono::NaiveDate;

use examtrack_store::settings::{load_settings, save_settings};

use super::open_store;

pub fn show() -> Result<()> {
    let store = open_store()?;
    let settings = load_settings(store.paths());
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub fn set(
    semester: Option<String>,
    logs_weight: Option<f64>,
    tests_weight: Option<f64>,
    default_exam_date: Option<NaiveDate>,
    momentum_days: Option<u32>,
    focus_n: Option<usize>,
) -> Result<()> {
    let store = open_store()?;
    let mut settings = load_settings(store.paths());

    if let Some(weight) = logs_weight {
        anyhow::ensure!(
            (0.0..=1.0).contains(&weight),
            "logs weight must be between 0.0 and 1.0"
        );
        settings.logs_weight = weight;
    }
    if let Some(weight) = tests_weight {
        anyhow::ensure!(
            (0.0..=1.0).contains(&weight),
            "tests weight must be between 0.0 and 1.0"
        );
        settings.tests_weight = Some(weight);
    }
    if let Some(semester) = semester {
        settings.semester = semester;
    }
    if let Some(date) = default_exam_date {
        settings.default_exam_date = date;
    }
    if let Some(days) = momentum_days {
        anyhow::ensure!(days >= 1, "momentum window must be at least 1 day");
        settings.momentum_days = days;
    }
    if let Some(n) = focus_n {
        anyhow::ensure!(n >= 1, "focus count must be at least 1");
        settings.focus_n = n;
    }

    save_settings(store.paths(), &settings)?;
    println!("Settings saved.");
    Ok(())
}

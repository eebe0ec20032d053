//! The `examtrack dashboard` command.

use anyhow::Result;
use chrono::Local;
use comfy_table::{Cell, Table};

use examtrack_core::insights::{daily_hours, recent_logs, score_curve, top_focus, upcoming_exams};
use examtrack_core::metrics::{compute_metrics, weighted_readiness};
use examtrack_core::tenancy::split_by_owner;
use examtrack_store::settings::load_settings;

use super::open_store;

pub fn execute(owner: Option<String>, format: String) -> Result<()> {
    let store = open_store()?;
    let settings = load_settings(store.paths());

    let mut subjects = store.load_subjects()?;
    let mut logs = store.load_logs()?;
    let mut tests = store.load_tests()?;
    if let Some(owner) = &owner {
        subjects = split_by_owner(&subjects, owner).0;
        logs = split_by_owner(&logs, owner).0;
        tests = split_by_owner(&tests, owner).0;
    }

    let today = Local::now().date_naive();
    let config = settings.metrics_config();
    let metrics = compute_metrics(&subjects, &logs, &tests, &config, today);
    let readiness = weighted_readiness(&metrics);

    if format == "json" {
        let payload = serde_json::json!({
            "semester": settings.semester,
            "readiness": readiness,
            "metrics": metrics,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Study dashboard - {}", settings.semester);

    match top_focus(&metrics, 1).first() {
        Some(focus) => println!(
            "Focus today on: {} (gap {:.2})",
            focus.name, focus.priority_gap
        ),
        None => println!("No subjects yet. Add one with `examtrack subject add`."),
    }
    println!("Overall readiness (weighted): {:.0}%", readiness * 100.0);
    println!("{} log(s), {} test(s) on file", logs.len(), tests.len());

    let top = top_focus(&metrics, settings.focus_n);
    if !top.is_empty() {
        println!("\nTop {} focus areas (by priority gap)", top.len());
        let mut table = Table::new();
        table.set_header(vec!["Subject", "Gap", "Avg score", "Hours", "Days left"]);
        for m in &top {
            table.add_row(vec![
                Cell::new(&m.name),
                Cell::new(format!("{:.2}", m.priority_gap)),
                Cell::new(format!("{:.1}", m.avg_score)),
                Cell::new(format!("{:.1}", m.hours)),
                Cell::new(m.days_left),
            ]);
        }
        println!("{table}");
    }

    println!("\nStudy momentum (last {} days)", settings.momentum_days);
    let momentum = daily_hours(&logs, settings.momentum_days, today);
    if momentum.is_empty() {
        println!("  no sessions in the window");
    } else {
        for (date, hours) in &momentum {
            println!("  {date}  {hours:.1}h");
        }
    }

    let curve = score_curve(&tests);
    if !curve.is_empty() {
        println!("\nTest average by date");
        for (date, avg) in &curve {
            println!("  {date}  {avg:.0}%");
        }
    }

    if settings.show_upcoming_exams && !metrics.is_empty() {
        println!("\nUpcoming exams");
        let mut table = Table::new();
        table.set_header(vec!["Subject", "Exam date", "Days left", "Gap", "Avg score"]);
        for m in upcoming_exams(&metrics) {
            table.add_row(vec![
                Cell::new(&m.name),
                Cell::new(m.exam_date),
                Cell::new(m.days_left),
                Cell::new(format!("{:.2}", m.priority_gap)),
                Cell::new(format!("{:.1}", m.avg_score)),
            ]);
        }
        println!("{table}");
    }

    if settings.show_recent_activity {
        let recent = recent_logs(&logs, 10);
        if !recent.is_empty() {
            println!("\nRecent activity");
            for log in recent {
                let date = log
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "(undated)".to_string());
                println!("  {date}  {:.1}h  {}  {}", log.hours, log.task, log.subject_id);
            }
        }
    }

    Ok(())
}

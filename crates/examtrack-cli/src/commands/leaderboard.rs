//! The `examtrack leaderboard` command.

use anyhow::Result;
use chrono::Local;
use comfy_table::{Cell, Table};

use examtrack_core::leaderboard::compute_leaderboard;

use super::open_store;

pub fn execute() -> Result<()> {
    let store = open_store()?;
    let users = store.load_users()?;
    if users.is_empty() {
        println!("No users on file; the leaderboard needs rows in users.csv.");
        return Ok(());
    }

    let logs = store.load_logs()?;
    let tests = store.load_tests()?;
    let today = Local::now().date_naive();
    let rows = compute_leaderboard(&logs, &tests, &users, today);

    let mut table = Table::new();
    table.set_header(vec![
        "Rank", "User", "Score", "Hours", "Tests avg", "Streak", "Best streak",
    ]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(row.rank),
            Cell::new(&row.username),
            Cell::new(format!("{:.0}", row.score)),
            Cell::new(format!("{:.1}", row.hours)),
            Cell::new(format!("{:.1}", row.tests_avg)),
            Cell::new(row.streak_current),
            Cell::new(row.streak_best),
        ]);
    }
    println!("{table}");
    Ok(())
}

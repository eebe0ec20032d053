//! The `examtrack init` command.

use anyhow::Result;

use super::open_store;

pub fn execute() -> Result<()> {
    let store = open_store()?;
    let subjects = store.load_subjects()?;

    println!("Data directory ready: {}", store.paths().root().display());
    println!("{} subject(s) on file", subjects.len());

    println!("\nNext steps:");
    println!("  1. examtrack subject add \"Organic synthesis\" --credits 2 --confidence 3");
    println!("  2. examtrack log add <subject-id> 1.5 --task Read --score 70");
    println!("  3. examtrack dashboard");

    Ok(())
}

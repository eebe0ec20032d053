//! The `examtrack backup` command.

use anyhow::Result;

use super::open_store;

pub fn execute() -> Result<()> {
    let store = open_store()?;
    let target = store.backup()?;
    println!("Backup written to {}", target.display());
    Ok(())
}

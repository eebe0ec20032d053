pub mod backup;
pub mod dashboard;
pub mod doctor;
pub mod init;
pub mod leaderboard;
pub mod log;
pub mod selftest;
pub mod settings;
pub mod subject;

use anyhow::Result;
use examtrack_store::{CsvStore, DataPaths};

/// Open the store at the resolved data directory, preparing it if needed.
pub(crate) fn open_store() -> Result<CsvStore> {
    let paths = DataPaths::resolve()?;
    tracing::debug!(root = %paths.root().display(), "opening store");
    Ok(CsvStore::open(paths)?)
}

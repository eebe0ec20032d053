//! examtrack-store — flat-file persistence for examtrack.
//!
//! Entities live in CSV files and settings in a JSON document under a
//! resolvable data directory. Every save is write-to-temp-then-rename, so
//! concurrent readers never observe a half-written file. Loads are
//! lenient: malformed rows are repaired or skipped with a warning, never
//! fatal.

pub mod doctor;
pub mod error;
pub mod paths;
pub mod settings;
pub mod store;

pub use error::StoreError;
pub use paths::DataPaths;
pub use settings::Settings;
pub use store::CsvStore;

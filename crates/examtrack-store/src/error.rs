//! Store error types.
//!
//! Only genuine failures surface here (unreadable directories, broken
//! files the lenient loaders cannot even open). Malformed individual rows
//! are repaired or skipped by the loaders and never produce an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the flat-file store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An underlying filesystem operation failed.
    #[error("I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be opened or written at all.
    #[error("failed to read or write {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The settings document could not be serialized.
    #[error("invalid settings document {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No data directory could be resolved from the environment.
    #[error("no usable data directory; set EXAMTRACK_DATA_DIR or HOME")]
    NoDataDir,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.into(),
            source,
        }
    }
}

//! Data directory resolution and well-known file paths.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Directory name under the platform data dir.
const APP_DIR: &str = "examtrack";

/// The resolved data directory and the files inside it.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Resolve the per-user data directory.
    ///
    /// Search order:
    /// 1. `EXAMTRACK_DATA_DIR` (explicit override, also used by tests)
    /// 2. `$XDG_DATA_HOME/examtrack`
    /// 3. `~/.local/share/examtrack`
    pub fn resolve() -> Result<Self, StoreError> {
        if let Ok(dir) = env::var("EXAMTRACK_DATA_DIR") {
            if !dir.trim().is_empty() {
                return Ok(Self::from_root(dir.trim()));
            }
        }
        if let Ok(xdg) = env::var("XDG_DATA_HOME") {
            if !xdg.trim().is_empty() {
                return Ok(Self::from_root(PathBuf::from(xdg).join(APP_DIR)));
            }
        }
        if let Ok(home) = env::var("HOME") {
            if !home.trim().is_empty() {
                return Ok(Self::from_root(
                    PathBuf::from(home).join(".local").join("share").join(APP_DIR),
                ));
            }
        }
        Err(StoreError::NoDataDir)
    }

    /// Use an explicit directory instead of resolving one.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subjects_csv(&self) -> PathBuf {
        self.root.join("subjects.csv")
    }

    pub fn logs_csv(&self) -> PathBuf {
        self.root.join("logs.csv")
    }

    pub fn tests_csv(&self) -> PathBuf {
        self.root.join("tests.csv")
    }

    pub fn users_csv(&self) -> PathBuf {
        self.root.join("users.csv")
    }

    pub fn settings_json(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join("backups")
    }
}

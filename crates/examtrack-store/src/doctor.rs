//! Store health check.
//!
//! A quick, non-destructive diagnosis of the data directory: do the
//! folders and files exist, do the CSV headers carry the expected
//! columns, and is the directory writable.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::paths::DataPaths;
use crate::store::{LOG_COLUMNS, SUBJECT_COLUMNS, TEST_COLUMNS, USER_COLUMNS};

/// Outcome of a health check, serializable for `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub data_dir_exists: bool,
    pub backups_dir_exists: bool,
    pub files_exist: BTreeMap<String, bool>,
    pub schemas_ok: BTreeMap<String, bool>,
    pub write_ok: bool,
}

impl HealthReport {
    /// True when every probe passed.
    pub fn healthy(&self) -> bool {
        self.data_dir_exists
            && self.backups_dir_exists
            && self.files_exist.values().all(|ok| *ok)
            && self.schemas_ok.values().all(|ok| *ok)
            && self.write_ok
    }
}

/// Check whether a CSV file's header carries at least the given columns.
/// The legacy `user_id` column satisfies `owner`.
fn schema_ok(path: &Path, required: &[&str]) -> bool {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(_) => return false,
    };
    let headers = match reader.headers() {
        Ok(headers) => headers,
        Err(_) => return false,
    };
    let names: Vec<&str> = headers.iter().collect();
    required.iter().all(|col| {
        names.contains(col) || (*col == "owner" && names.contains(&"user_id"))
    })
}

/// Run every probe against the data directory.
pub fn run_health_check(paths: &DataPaths) -> HealthReport {
    let files = [
        ("subjects", paths.subjects_csv()),
        ("logs", paths.logs_csv()),
        ("tests", paths.tests_csv()),
        ("users", paths.users_csv()),
        ("settings", paths.settings_json()),
    ];

    let files_exist: BTreeMap<String, bool> = files
        .iter()
        .map(|(name, path)| (name.to_string(), path.exists()))
        .collect();

    let schemas: [(&str, &[&str]); 4] = [
        ("subjects", &SUBJECT_COLUMNS),
        ("logs", &LOG_COLUMNS),
        ("tests", &TEST_COLUMNS),
        ("users", &USER_COLUMNS),
    ];
    let schemas_ok: BTreeMap<String, bool> = schemas
        .iter()
        .map(|(name, required)| {
            let path = paths.root().join(format!("{name}.csv"));
            (name.to_string(), schema_ok(&path, required))
        })
        .collect();

    let probe = paths.root().join("_write_probe.tmp");
    let write_ok = match std::fs::write(&probe, "ok") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    };

    HealthReport {
        data_dir_exists: paths.root().exists(),
        backups_dir_exists: paths.backups_dir().exists(),
        files_exist,
        schemas_ok,
        write_ok,
    }
}

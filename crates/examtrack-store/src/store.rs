//! CSV-backed entity store with atomic replace.
//!
//! Opening the store prepares the data directory: folders are created,
//! missing files are seeded (a starter subject set on first run, header
//! rows for the rest), and a default settings document is written. Loads
//! pass every row through the repair policy in `examtrack_core::normalize`
//! and skip rows that cannot be decoded at all.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use examtrack_core::model::{LogEntry, Subject, TestEntry, UserProfile};
use examtrack_core::normalize::{normalize_log, normalize_subject, normalize_test, RawLog, RawSubject, RawTest};
use examtrack_core::tenancy::{merge_rows, MergeMode};

use crate::error::StoreError;
use crate::paths::DataPaths;
use crate::settings::{save_settings, Settings};

pub const SUBJECT_COLUMNS: [&str; 6] = ["id", "name", "credits", "confidence", "exam_date", "owner"];
pub const LOG_COLUMNS: [&str; 8] = [
    "id", "date", "subject_id", "hours", "task", "score", "notes", "owner",
];
pub const TEST_COLUMNS: [&str; 7] = [
    "id", "date", "subject_id", "score", "difficulty", "notes", "owner",
];
pub const USER_COLUMNS: [&str; 2] = ["id", "username"];

/// Write `bytes` to a temp file next to `path`, then rename over it.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StoreError::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

/// Flat-file store rooted at a [`DataPaths`].
#[derive(Debug)]
pub struct CsvStore {
    paths: DataPaths,
}

impl CsvStore {
    /// Open the store, preparing the directory tree and seeding missing
    /// files. Safe to call on every startup.
    pub fn open(paths: DataPaths) -> Result<Self, StoreError> {
        std::fs::create_dir_all(paths.root()).map_err(|e| StoreError::io(paths.root(), e))?;
        std::fs::create_dir_all(paths.backups_dir())
            .map_err(|e| StoreError::io(paths.backups_dir(), e))?;

        let store = Self { paths };

        if !store.paths.settings_json().exists() {
            save_settings(&store.paths, &Settings::default())?;
        }
        if !store.paths.subjects_csv().exists() {
            store.save_subjects(&starter_subjects())?;
        }
        if !store.paths.logs_csv().exists() {
            store.save_logs(&[])?;
        }
        if !store.paths.tests_csv().exists() {
            store.save_tests(&[])?;
        }
        if !store.paths.users_csv().exists() {
            store.save_users(&[])?;
        }

        Ok(store)
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    // ---- loads ----

    pub fn load_subjects(&self) -> Result<Vec<Subject>, StoreError> {
        load_rows(&self.paths.subjects_csv(), |raw: RawSubject| {
            normalize_subject(raw, None)
        })
    }

    pub fn load_logs(&self) -> Result<Vec<LogEntry>, StoreError> {
        load_rows(&self.paths.logs_csv(), |raw: RawLog| normalize_log(raw, None))
    }

    pub fn load_tests(&self) -> Result<Vec<TestEntry>, StoreError> {
        load_rows(&self.paths.tests_csv(), |raw: RawTest| {
            normalize_test(raw, None)
        })
    }

    pub fn load_users(&self) -> Result<Vec<UserProfile>, StoreError> {
        load_rows(&self.paths.users_csv(), |user: UserProfile| user)
    }

    // ---- saves ----

    pub fn save_subjects(&self, rows: &[Subject]) -> Result<(), StoreError> {
        save_rows(&self.paths.subjects_csv(), &SUBJECT_COLUMNS, rows)
    }

    pub fn save_logs(&self, rows: &[LogEntry]) -> Result<(), StoreError> {
        save_rows(&self.paths.logs_csv(), &LOG_COLUMNS, rows)
    }

    pub fn save_tests(&self, rows: &[TestEntry]) -> Result<(), StoreError> {
        save_rows(&self.paths.tests_csv(), &TEST_COLUMNS, rows)
    }

    pub fn save_users(&self, rows: &[UserProfile]) -> Result<(), StoreError> {
        save_rows(&self.paths.users_csv(), &USER_COLUMNS, rows)
    }

    // ---- single-row helpers ----

    pub fn add_subject(&self, subject: Subject) -> Result<(), StoreError> {
        let mut rows = self.load_subjects()?;
        rows.push(subject);
        self.save_subjects(&rows)
    }

    pub fn add_log(&self, log: LogEntry) -> Result<(), StoreError> {
        let mut rows = self.load_logs()?;
        rows.push(log);
        self.save_logs(&rows)
    }

    pub fn add_test(&self, test: TestEntry) -> Result<(), StoreError> {
        let mut rows = self.load_tests()?;
        rows.push(test);
        self.save_tests(&rows)
    }

    /// Remove a subject by id. Returns whether a row was removed. Log and
    /// test rows referencing it become orphans and drop out of metrics on
    /// their own.
    pub fn remove_subject(&self, id: &str) -> Result<bool, StoreError> {
        let mut rows = self.load_subjects()?;
        let before = rows.len();
        rows.retain(|s| s.id != id);
        let removed = rows.len() != before;
        if removed {
            self.save_subjects(&rows)?;
        }
        Ok(removed)
    }

    // ---- imports ----

    pub fn import_subjects(
        &self,
        incoming: Vec<Subject>,
        owner: Option<&str>,
        mode: MergeMode,
    ) -> Result<usize, StoreError> {
        let count = incoming.len();
        let merged = merge_rows(self.load_subjects()?, incoming, owner, mode);
        self.save_subjects(&merged)?;
        Ok(count)
    }

    pub fn import_logs(
        &self,
        incoming: Vec<LogEntry>,
        owner: Option<&str>,
        mode: MergeMode,
    ) -> Result<usize, StoreError> {
        let count = incoming.len();
        let merged = merge_rows(self.load_logs()?, incoming, owner, mode);
        self.save_logs(&merged)?;
        Ok(count)
    }

    pub fn import_tests(
        &self,
        incoming: Vec<TestEntry>,
        owner: Option<&str>,
        mode: MergeMode,
    ) -> Result<usize, StoreError> {
        let count = incoming.len();
        let merged = merge_rows(self.load_tests()?, incoming, owner, mode);
        self.save_tests(&merged)?;
        Ok(count)
    }

    /// Copy the live files into a timestamped directory under `backups/`.
    pub fn backup(&self) -> Result<PathBuf, StoreError> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let target = self.paths.backups_dir().join(format!("backup_{stamp}"));
        std::fs::create_dir_all(&target).map_err(|e| StoreError::io(&target, e))?;
        for source in [
            self.paths.subjects_csv(),
            self.paths.logs_csv(),
            self.paths.tests_csv(),
            self.paths.users_csv(),
            self.paths.settings_json(),
        ] {
            if source.exists() {
                let name = source.file_name().unwrap_or_default();
                let dest = target.join(name);
                std::fs::copy(&source, &dest).map_err(|e| StoreError::io(&dest, e))?;
            }
        }
        Ok(target)
    }
}

fn load_rows<R, T, F>(path: &Path, convert: F) -> Result<Vec<T>, StoreError>
where
    R: DeserializeOwned,
    F: Fn(R) -> T,
{
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;
    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<R>().enumerate() {
        match record {
            Ok(raw) => rows.push(convert(raw)),
            Err(err) => {
                tracing::warn!(path = %path.display(), row = index + 1, %err, "skipping undecodable row");
            }
        }
    }
    Ok(rows)
}

fn save_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        // serde-based writers only emit headers alongside records
        writer
            .write_record(header)
            .map_err(|e| StoreError::csv(path, e))?;
    }
    for row in rows {
        writer.serialize(row).map_err(|e| StoreError::csv(path, e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::io(path, std::io::Error::other(e.to_string())))?;
    write_atomic(path, &bytes)
}

/// Neutral starter subjects written on first run; freely editable.
fn starter_subjects() -> Vec<Subject> {
    let starter = |id: &str, name: &str, confidence: u8| Subject {
        id: id.to_string(),
        name: name.to_string(),
        credits: 2,
        confidence,
        exam_date: None,
        owner: String::new(),
    };
    vec![
        starter("linear-algebra", "Linear algebra", 6),
        starter("calculus", "Calculus", 5),
        starter("mechanics", "Classical mechanics", 4),
        starter("statistics", "Probability & statistics", 7),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn open_store() -> (tempfile::TempDir, CsvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::open(DataPaths::from_root(dir.path())).unwrap();
        (dir, store)
    }

    fn subject(id: &str, owner: &str) -> Subject {
        Subject {
            id: id.into(),
            name: format!("Subject {id}"),
            credits: 2,
            confidence: 5,
            exam_date: NaiveDate::from_ymd_opt(2025, 9, 5),
            owner: owner.into(),
        }
    }

    #[test]
    fn open_seeds_files_and_settings() {
        let (_dir, store) = open_store();
        assert!(store.paths().settings_json().exists());
        assert!(store.paths().logs_csv().exists());
        assert!(store.paths().users_csv().exists());
        let subjects = store.load_subjects().unwrap();
        assert!(!subjects.is_empty());
        assert!(store.load_logs().unwrap().is_empty());
    }

    #[test]
    fn subjects_roundtrip() {
        let (_dir, store) = open_store();
        let rows = vec![subject("a", "u1"), subject("b", "")];
        store.save_subjects(&rows).unwrap();
        assert_eq!(store.load_subjects().unwrap(), rows);
    }

    #[test]
    fn load_repairs_out_of_range_fields() {
        let (_dir, store) = open_store();
        std::fs::write(
            store.paths().subjects_csv(),
            "id,name,credits,confidence,exam_date,owner\n\
             s1,Algebra,0,15,not-a-date,u1\n",
        )
        .unwrap();
        let subjects = store.load_subjects().unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].credits, 1);
        assert_eq!(subjects[0].confidence, 10);
        assert_eq!(subjects[0].exam_date, None);
    }

    #[test]
    fn load_preserves_score_repair_asymmetry() {
        let (_dir, store) = open_store();
        std::fs::write(
            store.paths().logs_csv(),
            "id,date,subject_id,hours,task,score,notes,owner\n\
             l1,2025-08-01,s1,2.0,Read,150,,u1\n",
        )
        .unwrap();
        std::fs::write(
            store.paths().tests_csv(),
            "id,date,subject_id,score,difficulty,notes,owner\n\
             t1,2025-08-01,s1,150,3,,u1\n",
        )
        .unwrap();
        assert_eq!(store.load_logs().unwrap()[0].score, None);
        assert_eq!(store.load_tests().unwrap()[0].score, Some(100));
    }

    #[test]
    fn undecodable_row_is_skipped() {
        let (_dir, store) = open_store();
        std::fs::write(
            store.paths().subjects_csv(),
            "id,name,credits,confidence,exam_date,owner\n\
             good,Algebra,2,5,2025-09-05,u1\n\
             bad,row,with,too,many,fields,entirely\n",
        )
        .unwrap();
        let subjects = store.load_subjects().unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].id, "good");
    }

    #[test]
    fn legacy_user_id_header_accepted() {
        let (_dir, store) = open_store();
        std::fs::write(
            store.paths().subjects_csv(),
            "id,name,credits,confidence,exam_date,user_id\n\
             s1,Algebra,2,5,2025-09-05,legacy-user\n",
        )
        .unwrap();
        let subjects = store.load_subjects().unwrap();
        assert_eq!(subjects[0].owner, "legacy-user");
    }

    #[test]
    fn add_log_appends() {
        let (_dir, store) = open_store();
        let log = LogEntry {
            id: "l1".into(),
            date: NaiveDate::from_ymd_opt(2025, 8, 1),
            subject_id: "s1".into(),
            hours: 1.5,
            task: "Read".into(),
            score: Some(70),
            notes: "ch. 3".into(),
            owner: "u1".into(),
        };
        store.add_log(log.clone()).unwrap();
        store
            .add_log(LogEntry {
                id: "l2".into(),
                ..log.clone()
            })
            .unwrap();
        let logs = store.load_logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0], log);
    }

    #[test]
    fn remove_subject_reports_outcome() {
        let (_dir, store) = open_store();
        store.save_subjects(&[subject("a", "")]).unwrap();
        assert!(store.remove_subject("a").unwrap());
        assert!(!store.remove_subject("a").unwrap());
        assert!(store.load_subjects().unwrap().is_empty());
    }

    #[test]
    fn import_replace_keeps_other_owners() {
        let (_dir, store) = open_store();
        store
            .save_subjects(&[subject("mine", "u1"), subject("theirs", "u2")])
            .unwrap();
        store
            .import_subjects(vec![subject("new", "")], Some("u1"), MergeMode::Replace)
            .unwrap();
        let subjects = store.load_subjects().unwrap();
        let ids: Vec<&str> = subjects.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["theirs", "new"]);
        assert_eq!(subjects[1].owner, "u1");
    }

    #[test]
    fn save_replaces_previous_content() {
        let (_dir, store) = open_store();
        store.save_subjects(&[subject("a", ""), subject("b", "")]).unwrap();
        store.save_subjects(&[subject("c", "")]).unwrap();
        let subjects = store.load_subjects().unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].id, "c");
    }

    #[test]
    fn backup_copies_live_files() {
        let (_dir, store) = open_store();
        let target = store.backup().unwrap();
        assert!(target.join("subjects.csv").exists());
        assert!(target.join("settings.json").exists());
    }
}

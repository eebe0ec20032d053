//! The app-wide settings document (`settings.json`).
//!
//! Loading never fails: a missing or corrupt file falls back to defaults,
//! and fields absent from an older document are backfilled from their
//! defaults via serde.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use examtrack_core::model::MetricsConfig;

use crate::error::StoreError;
use crate::paths::DataPaths;
use crate::store::write_atomic;

/// Persisted, user-editable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Display label for the current study period.
    #[serde(default = "default_semester")]
    pub semester: String,
    /// Fallback exam date for subjects without one of their own.
    #[serde(default = "default_exam_date")]
    pub default_exam_date: NaiveDate,
    /// Weight of log scores in the blended average, in [0, 1].
    #[serde(default = "default_logs_weight")]
    pub logs_weight: f64,
    /// Explicit test-score weight; derived from `logs_weight` when absent.
    #[serde(default)]
    pub tests_weight: Option<f64>,
    /// Trailing window for the momentum chart, in days.
    #[serde(default = "default_momentum_days")]
    pub momentum_days: u32,
    /// How many focus subjects the dashboard lists.
    #[serde(default = "default_focus_n")]
    pub focus_n: usize,
    #[serde(default = "default_true")]
    pub show_upcoming_exams: bool,
    #[serde(default = "default_true")]
    pub show_recent_activity: bool,
}

fn default_semester() -> String {
    "Semester 1".to_string()
}

fn default_exam_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 5).expect("static date")
}

fn default_logs_weight() -> f64 {
    0.70
}

fn default_momentum_days() -> u32 {
    7
}

fn default_focus_n() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            semester: default_semester(),
            default_exam_date: default_exam_date(),
            logs_weight: default_logs_weight(),
            tests_weight: None,
            momentum_days: default_momentum_days(),
            focus_n: default_focus_n(),
            show_upcoming_exams: true,
            show_recent_activity: true,
        }
    }
}

impl Settings {
    /// The slice of settings the metrics engine consumes.
    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            logs_weight: self.logs_weight,
            tests_weight: self.tests_weight,
            default_exam_date: self.default_exam_date,
        }
    }
}

/// Load settings, falling back to defaults on any problem.
pub fn load_settings(paths: &DataPaths) -> Settings {
    let path = paths.settings_json();
    match std::fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "corrupt settings, using defaults");
                Settings::default()
            }
        },
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "no settings file, using defaults");
            Settings::default()
        }
    }
}

/// Persist settings atomically.
pub fn save_settings(paths: &DataPaths, settings: &Settings) -> Result<(), StoreError> {
    let path = paths.settings_json();
    let json = serde_json::to_string_pretty(settings).map_err(|source| StoreError::Settings {
        path: path.clone(),
        source,
    })?;
    write_atomic(&path, json.as_bytes())
}

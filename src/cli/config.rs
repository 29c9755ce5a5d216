//! JSON configuration file

use super::{DEFAULT_INTERVAL_SECS, RunPlan};
use crate::{BackupOptions, Error, Result, SnapshotFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings read from `config.json`.
///
/// A file that loads successfully replaces the command-line flags entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auto_enable: bool,
    /// Seconds between automatic backups.
    pub auto_time_interval: i64,
    pub backup_path: String,
    /// Accepted for compatibility; old snapshots are never pruned.
    pub keep_number: Option<i64>,
    pub zip_enable: bool,
    pub source_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_enable: false,
            auto_time_interval: DEFAULT_INTERVAL_SECS as i64,
            backup_path: String::new(),
            keep_number: None,
            zip_enable: false,
            source_path: String::new(),
        }
    }
}

/// Parse configuration from JSON text. The top level must be an object.
pub fn parse_config(text: &str) -> Result<Config> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::Config(format!(
            "expected a JSON object at the top level, found {value}"
        )));
    }
    serde_json::from_value(value).map_err(|e| Error::Config(e.to_string()))
}

/// Load configuration from `path`. A missing file is reported as `Error::Io`.
pub fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)?;
    parse_config(&text).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}

fn non_empty(value: &str) -> Option<PathBuf> {
    (!value.trim().is_empty()).then(|| PathBuf::from(value))
}

impl Config {
    /// Build the run plan this configuration describes.
    pub fn to_plan(&self) -> Result<RunPlan> {
        if let Some(keep) = self.keep_number {
            log::warn!("keep_number = {keep} is ignored: old backups are never deleted");
        }

        let schedule = if self.auto_enable {
            let secs = u64::try_from(self.auto_time_interval)
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "auto_time_interval must be greater than zero, got {}",
                        self.auto_time_interval
                    ))
                })?;
            Some(Duration::from_secs(secs))
        } else {
            None
        };

        Ok(RunPlan {
            options: BackupOptions {
                source: non_empty(&self.source_path),
                destination_root: non_empty(&self.backup_path),
                format: SnapshotFormat::from_zip_flag(self.zip_enable),
            },
            schedule,
        })
    }
}

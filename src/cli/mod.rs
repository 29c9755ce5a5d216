//! Command-line surface: flag parsing, config file loading, and result output

pub mod args;
pub mod config;
pub mod output;

use crate::BackupOptions;
use std::time::Duration;

/// Default seconds between automatic backups.
pub const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// What the binary should do, built once from flags or the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub options: BackupOptions,
    /// `Some(interval)` repeats the backup until cancelled.
    pub schedule: Option<Duration>,
}

//! Data models for snapshot results, per-file reports, and entry errors

use serde::{Deserialize, Serialize};

/// Output form of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// `<root>/<timestamp>.zip` with a single `<timestamp>/` top folder
    Archive,
    /// `<root>/<timestamp>/` mirroring the source tree
    #[default]
    Directory,
}

impl SnapshotFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotFormat::Archive => "archive",
            SnapshotFormat::Directory => "directory",
        }
    }

    #[must_use]
    pub fn from_zip_flag(zip: bool) -> Self {
        if zip {
            SnapshotFormat::Archive
        } else {
            SnapshotFormat::Directory
        }
    }
}

impl std::fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regular file written into a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReport {
    /// Path relative to the source directory, `/`-separated
    pub path: String,
    pub bytes: u64,
}

/// Which side of a copy failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryErrorKind {
    Read,
    Write,
}

/// Represents an error encountered for a single entry during a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub kind: EntryErrorKind,
    pub code: String,
    pub message: String,
}

impl ErrorItem {
    #[must_use]
    pub fn from_io(path: String, kind: EntryErrorKind, error: &std::io::Error) -> Self {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => "ENOENT",
            std::io::ErrorKind::PermissionDenied => "EACCES",
            _ => "IO",
        };

        Self {
            path,
            kind,
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Outcome of one snapshot operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResult {
    pub timestamp: String,
    pub format: SnapshotFormat,
    pub source: String,
    /// Archive file or mirror directory that was produced
    pub output: String,
    pub files: Vec<EntryReport>,
    pub directory_count: u64,
    pub other_count: u64,
    pub bytes_written: u64,
    pub errors: Vec<ErrorItem>,
    pub started_at: String,  // RFC3339 format
    pub finished_at: String, // RFC3339 format
}

impl SnapshotResult {
    /// True when every reachable entry was written without error.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

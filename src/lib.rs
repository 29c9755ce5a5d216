//! Save-Data Snapshot Library
//!
//! This library copies the Dark Souls III save folder into timestamped
//! snapshots under a destination root, either as a zip archive or as a
//! mirrored directory tree, and can repeat that on a cancellable schedule.

pub mod cli;
pub mod models;
pub mod services;

pub use models::{EntryErrorKind, EntryReport, ErrorItem, SnapshotFormat, SnapshotResult};
pub use services::schedule::{CancellationToken, run_schedule};
pub use services::timestamp::SnapshotTimestamp;

use services::{locate, prepare, sink, traverse};
use std::io;
use std::path::PathBuf;
use std::result;

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    InvalidInput(String),
    Config(String),
    SourceNotFound(PathBuf),
    SourceNotADirectory(PathBuf),
    UserResolutionFailed,
    DestinationUnwritable { path: PathBuf, source: io::Error },
}

impl Error {
    /// Whether no later run could succeed either, so the process should stop.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::SourceNotFound(_)
                | Error::SourceNotADirectory(_)
                | Error::UserResolutionFailed
                | Error::InvalidInput(_)
                | Error::Config(_)
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
            Error::SourceNotFound(path) => {
                write!(f, "Save data folder does not exist: {}", path.display())
            }
            Error::SourceNotADirectory(path) => {
                write!(f, "Save data path is not a directory: {}", path.display())
            }
            Error::UserResolutionFailed => {
                write!(f, "Could not determine the current user's home directory")
            }
            Error::DestinationUnwritable { path, source } => {
                write!(f, "Cannot write backup to {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) | Error::DestinationUnwritable { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Options for one snapshot operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupOptions {
    /// Directory to back up; `None` means the current user's save-data folder.
    pub source: Option<PathBuf>,
    /// Parent of the timestamped snapshots; `None` or empty means the default root.
    pub destination_root: Option<PathBuf>,
    pub format: SnapshotFormat,
}

/// Take a snapshot named after the current time.
pub fn run_snapshot(options: &BackupOptions) -> Result<SnapshotResult> {
    run_snapshot_at(options, SnapshotTimestamp::now())
}

/// Take a snapshot named after `timestamp`.
///
/// The source is validated before anything is written, so a missing source
/// leaves the destination untouched. Per-entry failures are collected in the
/// returned result; only an unusable source or destination is an `Err`.
pub fn run_snapshot_at(
    options: &BackupOptions,
    timestamp: SnapshotTimestamp,
) -> Result<SnapshotResult> {
    let source = match &options.source {
        Some(path) => {
            locate::validate_source(path)?;
            path.clone()
        }
        None => locate::resolve_source_path()?,
    };

    let destination_root = match &options.destination_root {
        Some(path) if !path.as_os_str().is_empty() => path.clone(),
        _ => locate::default_destination_root()?,
    };

    prepare::ensure_directory(&destination_root).map_err(|e| Error::DestinationUnwritable {
        path: destination_root.clone(),
        source: e,
    })?;

    let started_at = chrono::Local::now();
    let output_path = sink::snapshot_output_path(&destination_root, &timestamp, options.format);

    let mut snapshot_sink = sink::open_sink(&destination_root, &timestamp, options.format)
        .map_err(|e| Error::DestinationUnwritable {
            path: output_path.clone(),
            source: e,
        })?;

    log::info!(
        "Backing up {} to {} ({})",
        source.display(),
        output_path.display(),
        options.format
    );

    let mut context = traverse::TraversalContext::new(&source);
    traverse::traverse_directory(&source, snapshot_sink.as_mut(), &mut context);

    let output = snapshot_sink
        .finish()
        .map_err(|e| Error::DestinationUnwritable {
            path: output_path,
            source: e,
        })?;

    let finished_at = chrono::Local::now();

    log::info!(
        "Backup {} finished at {}: {} files ({} bytes), {} directories, {} errors",
        timestamp,
        timestamp.display(),
        context.files.len(),
        context.bytes_written,
        context.directory_count,
        context.errors.len()
    );

    Ok(SnapshotResult {
        timestamp: timestamp.name(),
        format: options.format,
        source: source.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        files: context.files,
        directory_count: context.directory_count,
        other_count: context.other_count,
        bytes_written: context.bytes_written,
        errors: context.errors,
        started_at: started_at.to_rfc3339(),
        finished_at: finished_at.to_rfc3339(),
    })
}

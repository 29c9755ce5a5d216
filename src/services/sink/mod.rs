//! Snapshot sinks: where the bytes of walked entries end up.
//!
//! One traversal drives either sink, so archive and directory snapshots share
//! the same walk order, error handling, and accounting.

use crate::SnapshotFormat;
use crate::models::EntryErrorKind;
use crate::services::timestamp::SnapshotTimestamp;
use std::fs::Metadata;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

pub mod archive;
pub mod mirror;

pub use archive::ArchiveSink;
pub use mirror::MirrorSink;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Failure of a single entry inside a sink.
#[derive(Debug)]
pub struct SinkError {
    pub kind: EntryErrorKind,
    pub error: io::Error,
}

impl SinkError {
    #[must_use]
    pub fn read(error: io::Error) -> Self {
        Self {
            kind: EntryErrorKind::Read,
            error,
        }
    }

    #[must_use]
    pub fn write(error: io::Error) -> Self {
        Self {
            kind: EntryErrorKind::Write,
            error,
        }
    }
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = match self.kind {
            EntryErrorKind::Read => "read",
            EntryErrorKind::Write => "write",
        };
        write!(f, "{side} failed: {}", self.error)
    }
}

pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Trait implemented by snapshot outputs that receive walked entries.
///
/// Relative paths are relative to the source directory; the source root itself
/// is passed as an empty path. `metadata` is the source entry's own metadata
/// (symlinks are not followed).
///
/// A failed `visit_file` must not leave a partial entry behind.
pub trait SnapshotSink {
    /// Record a directory.
    fn visit_directory(&mut self, relative: &Path, metadata: &Metadata) -> SinkResult<()>;

    /// Write the contents of a regular file, returning the number of bytes copied.
    fn visit_file(
        &mut self,
        relative: &Path,
        metadata: &Metadata,
        reader: &mut dyn Read,
    ) -> SinkResult<u64>;

    /// Record a node that is neither a directory nor a regular file.
    fn visit_other(&mut self, relative: &Path, metadata: &Metadata) -> SinkResult<()>;

    /// Finalize the output once traversal completes and return its location.
    fn finish(self: Box<Self>) -> io::Result<PathBuf>;
}

/// Location of the snapshot produced for `timestamp` under `destination_root`.
#[must_use]
pub fn snapshot_output_path(
    destination_root: &Path,
    timestamp: &SnapshotTimestamp,
    format: SnapshotFormat,
) -> PathBuf {
    match format {
        SnapshotFormat::Archive => destination_root.join(format!("{}.zip", timestamp.name())),
        SnapshotFormat::Directory => destination_root.join(timestamp.name()),
    }
}

/// Open the sink for `format`.
pub fn open_sink(
    destination_root: &Path,
    timestamp: &SnapshotTimestamp,
    format: SnapshotFormat,
) -> io::Result<Box<dyn SnapshotSink>> {
    let sink: Box<dyn SnapshotSink> = match format {
        SnapshotFormat::Archive => Box::new(ArchiveSink::create(destination_root, timestamp)?),
        SnapshotFormat::Directory => Box::new(MirrorSink::create(destination_root, timestamp)?),
    };
    Ok(sink)
}

/// Stream `reader` into `writer`, telling read failures apart from write failures.
pub fn copy_stream<R, W>(reader: &mut R, writer: &mut W) -> SinkResult<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(SinkError::read(e)),
        };
        writer.write_all(&buf[..n]).map_err(SinkError::write)?;
        total += n as u64;
    }

    Ok(total)
}

/// Render a relative path with `/` separators on every platform.
///
/// Only normal components are kept, so `.` and prefixes never leak into
/// archive entry names.
#[must_use]
pub fn portable_path(relative: &Path) -> String {
    let mut out = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}

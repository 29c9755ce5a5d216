//! Zip archive sink writing `<root>/<timestamp>.zip`.

use super::{SinkError, SinkResult, SnapshotSink, copy_stream, portable_path};
use crate::SnapshotFormat;
use crate::services::timestamp::SnapshotTimestamp;
use chrono::{DateTime, Datelike, Local, Timelike};
use std::fs::{File, Metadata};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub struct ArchiveSink {
    writer: ZipWriter<BufWriter<File>>,
    path: PathBuf,
    root_name: String,
}

impl ArchiveSink {
    /// Create (or truncate) the archive file for `timestamp`.
    pub fn create(destination_root: &Path, timestamp: &SnapshotTimestamp) -> io::Result<Self> {
        let path =
            super::snapshot_output_path(destination_root, timestamp, SnapshotFormat::Archive);
        let file = File::create(&path)?;
        log::debug!("Writing archive {}", path.display());

        Ok(Self {
            writer: ZipWriter::new(BufWriter::new(file)),
            path,
            root_name: timestamp.name(),
        })
    }

    fn entry_name(&self, relative: &Path) -> String {
        let rel = portable_path(relative);
        if rel.is_empty() {
            self.root_name.clone()
        } else {
            format!("{}/{rel}", self.root_name)
        }
    }
}

fn zip_error(err: zip::result::ZipError) -> io::Error {
    io::Error::other(err)
}

/// Local modification time in DOS form; `None` when it falls outside 1980..=2107.
fn zip_timestamp(metadata: &Metadata) -> Option<zip::DateTime> {
    let modified: DateTime<Local> = metadata.modified().ok()?.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(modified.year()).ok()?,
        modified.month() as u8,
        modified.day() as u8,
        modified.hour() as u8,
        modified.minute() as u8,
        modified.second() as u8,
    )
    .ok()
}

fn entry_options(metadata: &Metadata, method: CompressionMethod) -> SimpleFileOptions {
    let mut options = SimpleFileOptions::default().compression_method(method);
    if let Some(modified) = zip_timestamp(metadata) {
        options = options.last_modified_time(modified);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options = options.unix_permissions(metadata.permissions().mode());
    }
    options
}

impl SnapshotSink for ArchiveSink {
    fn visit_directory(&mut self, relative: &Path, metadata: &Metadata) -> SinkResult<()> {
        let name = format!("{}/", self.entry_name(relative));
        log::debug!("Archive directory: {name}");
        self.writer
            .add_directory(name, entry_options(metadata, CompressionMethod::Stored))
            .map_err(|e| SinkError::write(zip_error(e)))
    }

    fn visit_file(
        &mut self,
        relative: &Path,
        metadata: &Metadata,
        reader: &mut dyn Read,
    ) -> SinkResult<u64> {
        let name = self.entry_name(relative);
        self.writer
            .start_file(
                name.as_str(),
                entry_options(metadata, CompressionMethod::Deflated),
            )
            .map_err(|e| SinkError::write(zip_error(e)))?;

        let written = match copy_stream(reader, &mut self.writer) {
            Ok(n) => n,
            Err(e) => {
                // Drop the truncated entry so the archive only holds complete files.
                if let Err(abort) = self.writer.abort_file() {
                    log::warn!("Could not discard partial entry {name}: {abort}");
                }
                return Err(e);
            }
        };
        log::debug!("Archive file: {name} ({written} bytes)");
        Ok(written)
    }

    fn visit_other(&mut self, relative: &Path, metadata: &Metadata) -> SinkResult<()> {
        // Header only: non-regular nodes are recorded, never followed.
        let name = self.entry_name(relative);
        log::debug!("Archive header-only entry: {name}");
        self.writer
            .start_file(
                name.as_str(),
                entry_options(metadata, CompressionMethod::Stored),
            )
            .map_err(|e| SinkError::write(zip_error(e)))
    }

    fn finish(self: Box<Self>) -> io::Result<PathBuf> {
        let ArchiveSink { writer, path, .. } = *self;
        let mut inner = writer.finish().map_err(zip_error)?;
        inner.flush()?;
        Ok(path)
    }
}

//! Depth-first source traversal feeding a snapshot sink

use crate::models::{EntryErrorKind, EntryReport, ErrorItem};
use crate::services::sink::{SinkError, SnapshotSink, portable_path};
use std::fs::{self, File, Metadata};
use std::path::{Path, PathBuf};

/// Traversal context to track state during the walk
pub struct TraversalContext {
    pub root: PathBuf,
    pub files: Vec<EntryReport>,
    pub errors: Vec<ErrorItem>,
    pub directory_count: u64,
    pub other_count: u64,
    pub bytes_written: u64,
}

impl TraversalContext {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            files: Vec::new(),
            errors: Vec::new(),
            directory_count: 0,
            other_count: 0,
            bytes_written: 0,
        }
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Name used in reports: `/`-separated and relative to the root, `.` for the root itself
    fn report_path(&self, path: &Path) -> String {
        let rel = portable_path(self.relative(path));
        if rel.is_empty() { ".".to_string() } else { rel }
    }

    /// Record an error encountered during traversal
    fn record_error(&mut self, path: &Path, kind: EntryErrorKind, error: &std::io::Error) {
        log::warn!("Failed to back up {}: {error}", path.display());
        self.errors
            .push(ErrorItem::from_io(self.report_path(path), kind, error));
    }

    fn record_sink_error(&mut self, path: &Path, error: &SinkError) {
        self.record_error(path, error.kind, &error.error);
    }

    fn visit_directory(&mut self, path: &Path, metadata: &Metadata, sink: &mut dyn SnapshotSink) {
        let relative = self.relative(path);
        match sink.visit_directory(relative, metadata) {
            Ok(()) => {
                if !relative.as_os_str().is_empty() {
                    self.directory_count += 1;
                }
            }
            Err(e) => self.record_sink_error(path, &e),
        }
    }

    fn visit_file(&mut self, path: &Path, sink: &mut dyn SnapshotSink) {
        let opened = File::open(path).and_then(|f| f.metadata().map(|m| (f, m)));
        let (mut file, metadata) = match opened {
            Ok(pair) => pair,
            Err(e) => {
                self.record_error(path, EntryErrorKind::Read, &e);
                return;
            }
        };

        let relative = self.relative(path);
        match sink.visit_file(relative, &metadata, &mut file) {
            Ok(bytes) => {
                self.bytes_written += bytes;
                self.files.push(EntryReport {
                    path: portable_path(relative),
                    bytes,
                });
            }
            Err(e) => self.record_sink_error(path, &e),
        }
    }

    fn visit_other(&mut self, path: &Path, metadata: &Metadata, sink: &mut dyn SnapshotSink) {
        match sink.visit_other(self.relative(path), metadata) {
            Ok(()) => self.other_count += 1,
            Err(e) => self.record_sink_error(path, &e),
        }
    }
}

/// Walk `root` depth-first, handing every entry to `sink`.
///
/// Directories are visited before their children and siblings come in
/// `read_dir` order. Symlinks are reported as non-regular entries and never
/// followed. Failures are collected in the context and never stop the walk.
pub fn traverse_directory(root: &Path, sink: &mut dyn SnapshotSink, context: &mut TraversalContext) {
    match fs::symlink_metadata(root) {
        Ok(metadata) => context.visit_directory(root, &metadata, sink),
        Err(e) => {
            context.record_error(root, EntryErrorKind::Read, &e);
            return;
        }
    }
    traverse_recursive(root, sink, context);
}

fn traverse_recursive(current: &Path, sink: &mut dyn SnapshotSink, context: &mut TraversalContext) {
    let entries = match fs::read_dir(current) {
        Ok(e) => e,
        Err(e) => {
            context.record_error(current, EntryErrorKind::Read, &e);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                context.record_error(current, EntryErrorKind::Read, &e);
                continue;
            }
        };

        let entry_path = entry.path();
        // DirEntry::metadata does not follow symlinks
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                context.record_error(&entry_path, EntryErrorKind::Read, &e);
                continue;
            }
        };

        let file_type = metadata.file_type();
        if file_type.is_dir() {
            context.visit_directory(&entry_path, &metadata, sink);
            traverse_recursive(&entry_path, sink, context);
        } else if file_type.is_file() {
            context.visit_file(&entry_path, sink);
        } else {
            context.visit_other(&entry_path, &metadata, sink);
        }
    }
}

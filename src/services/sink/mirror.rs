//! Filesystem mirror sink writing `<root>/<timestamp>/...`.

use super::{SinkError, SinkResult, SnapshotSink, copy_stream};
use crate::SnapshotFormat;
use crate::services::prepare::ensure_directory;
use crate::services::timestamp::SnapshotTimestamp;
use std::fs::{self, File, Metadata};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub struct MirrorSink {
    root: PathBuf,
}

impl MirrorSink {
    /// Create the snapshot directory for `timestamp`.
    pub fn create(destination_root: &Path, timestamp: &SnapshotTimestamp) -> io::Result<Self> {
        let root =
            super::snapshot_output_path(destination_root, timestamp, SnapshotFormat::Directory);
        ensure_directory(&root)?;
        Ok(Self { root })
    }
}

fn write_file(target: &Path, reader: &mut dyn Read) -> SinkResult<u64> {
    let file = File::create(target).map_err(SinkError::write)?;
    let mut writer = BufWriter::new(file);
    let written = copy_stream(reader, &mut writer)?;
    writer.flush().map_err(SinkError::write)?;
    Ok(written)
}

impl SnapshotSink for MirrorSink {
    fn visit_directory(&mut self, _relative: &Path, _metadata: &Metadata) -> SinkResult<()> {
        // Created on demand when a file below it is written.
        Ok(())
    }

    fn visit_file(
        &mut self,
        relative: &Path,
        _metadata: &Metadata,
        reader: &mut dyn Read,
    ) -> SinkResult<u64> {
        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            ensure_directory(parent).map_err(SinkError::write)?;
        }

        match write_file(&target, reader) {
            Ok(written) => {
                log::debug!("Copied {} ({written} bytes)", target.display());
                Ok(written)
            }
            Err(e) => {
                if target.is_file() {
                    if let Err(remove) = fs::remove_file(&target) {
                        log::warn!("Could not remove partial copy {}: {remove}", target.display());
                    }
                }
                Err(e)
            }
        }
    }

    fn visit_other(&mut self, relative: &Path, _metadata: &Metadata) -> SinkResult<()> {
        log::debug!("Skipping non-regular entry {}", relative.display());
        Ok(())
    }

    fn finish(self: Box<Self>) -> io::Result<PathBuf> {
        Ok(self.root)
    }
}

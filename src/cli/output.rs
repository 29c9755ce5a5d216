//! Output formatting for CLI

use crate::models::SnapshotResult;
use crate::services::format::format_size;
use crate::services::timestamp::SnapshotTimestamp;

/// Format the result as pretty JSON
#[must_use]
pub fn format_json(result: &SnapshotResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Format a human-readable summary of one snapshot
#[must_use]
pub fn format_text(result: &SnapshotResult) -> String {
    let when = SnapshotTimestamp::parse(&result.timestamp)
        .map_or_else(|_| result.timestamp.clone(), |ts| ts.display());

    let mut out = String::new();
    if result.is_complete() {
        out.push_str(&format!("Backup finished at {when}\n"));
    } else {
        out.push_str(&format!(
            "Backup finished at {when} with {} error(s)\n",
            result.errors.len()
        ));
    }

    out.push_str(&format!("  Source:      {}\n", result.source));
    out.push_str(&format!("  Output:      {} ({})\n", result.output, result.format));
    out.push_str(&format!(
        "  Files:       {} ({})\n",
        result.file_count(),
        format_size(result.bytes_written)
    ));
    out.push_str(&format!("  Directories: {}\n", result.directory_count));
    if result.other_count > 0 {
        out.push_str(&format!("  Other:       {}\n", result.other_count));
    }

    for error in &result.errors {
        out.push_str(&format!(
            "  ! {} [{}] {}\n",
            error.path, error.code, error.message
        ));
    }

    out
}

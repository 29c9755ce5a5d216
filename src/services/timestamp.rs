//! Second-resolution snapshot identifiers

use chrono::{Local, NaiveDateTime, Timelike};

const NAME_FORMAT: &str = "%Y%m%d%H%M%S";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Point in time naming one snapshot.
///
/// The same value names the archive file, the folder inside the archive, and
/// the mirror directory, so it is captured once per operation and passed
/// around by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotTimestamp(NaiveDateTime);

impl SnapshotTimestamp {
    /// Capture the current local time, truncated to whole seconds.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    #[must_use]
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        let truncated = datetime.with_nanosecond(0).unwrap_or(datetime);
        Self(truncated)
    }

    /// Parse the 14-digit `YYYYMMDDHHMMSS` form produced by [`Self::name`].
    pub fn parse(name: &str) -> Result<Self, String> {
        if name.len() != 14 || !name.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid snapshot timestamp '{name}'"));
        }
        NaiveDateTime::parse_from_str(name, NAME_FORMAT)
            .map(Self)
            .map_err(|e| format!("invalid snapshot timestamp '{name}': {e}"))
    }

    /// Sortable name used for snapshot files and folders.
    #[must_use]
    pub fn name(&self) -> String {
        self.0.format(NAME_FORMAT).to_string()
    }

    /// Human-readable form for summaries.
    #[must_use]
    pub fn display(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }

    #[must_use]
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl std::fmt::Display for SnapshotTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(NAME_FORMAT))
    }
}

impl std::str::FromStr for SnapshotTimestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

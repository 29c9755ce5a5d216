//! Source and default destination discovery

use crate::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Save-data folder relative to the user's home directory.
pub const GAME_DATA_COMPONENTS: [&str; 3] = ["AppData", "Roaming", "DarkSoulsIII"];

/// Product folder placed under the application-data directory.
pub const BACKUP_FOLDER_NAME: &str = "DarkSouls3Backup";

/// Build the save-data path under a given home directory.
#[must_use]
pub fn game_data_path_in(home: &Path) -> PathBuf {
    GAME_DATA_COMPONENTS
        .iter()
        .fold(home.to_path_buf(), |path, component| path.join(component))
}

/// Resolve and validate the current user's save-data directory.
pub fn resolve_source_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::UserResolutionFailed)?;
    let path = game_data_path_in(&home);
    log::info!("Save data path: {}", path.display());
    validate_source(&path)?;
    Ok(path)
}

/// Check that `path` exists and is a directory.
pub fn validate_source(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    if !metadata.is_dir() {
        return Err(Error::SourceNotADirectory(path.to_path_buf()));
    }

    Ok(())
}

/// Default destination root: `%APPDATA%\DarkSouls3Backup`.
pub fn default_destination_root() -> Result<PathBuf> {
    default_destination_root_from(std::env::var_os("APPDATA"), dirs::data_dir())
}

/// Pick the application-data base from the `APPDATA` value, falling back to the
/// platform data directory when the variable is unset or empty.
pub fn default_destination_root_from(
    appdata: Option<OsString>,
    data_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    let base = appdata
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(data_dir)
        .ok_or_else(|| {
            Error::InvalidInput(
                "cannot determine a default backup path; pass --backup-path".to_string(),
            )
        })?;

    Ok(base.join(BACKUP_FOLDER_NAME))
}

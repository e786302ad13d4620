//! Cache location resolution.
//!
//! Resolution order:
//! 1. `DEVNAME_DATA_DIR` environment variable (highest priority)
//! 2. System-local data directory, e.g. `~/.local/share/devname`

use std::env;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Environment variable overriding the cache directory.
pub const DATA_DIR_ENV: &str = "DEVNAME_DATA_DIR";

/// Root directory for the persisted table and metadata.
///
/// The directory is not created here; callers create it right before the
/// first write.
pub fn data_root() -> Result<PathBuf, StoreError> {
    if let Ok(path) = env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir().ok_or(StoreError::NoDataDir)?;
    Ok(data_dir.join("devname"))
}

/// Location of the persisted table document.
#[must_use]
pub fn table_path(root: &Path) -> PathBuf {
    root.join(crate::store::TABLE_FILE)
}

/// Location of the persisted revalidation metadata.
#[must_use]
pub fn metadata_path(root: &Path) -> PathBuf {
    root.join(crate::store::METADATA_FILE)
}

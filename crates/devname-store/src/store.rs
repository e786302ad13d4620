//! Filesystem table store.
//!
//! # Atomicity
//!
//! Both cache files are replaced via temp file + rename:
//! 1. Write to `<file>.tmp`
//! 2. Rename to `<file>` (atomic on Unix/macOS)
//!
//! A concurrent reader therefore sees either the old or the new document in
//! full, never a partially written one.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use devname_core::{
    CacheMetadata, LookupTable, StorePortError, StoredTable, TableDocument, TableStorePort,
};

use crate::error::StoreError;
use crate::paths;

/// File name of the persisted table document.
pub const TABLE_FILE: &str = "devices.json";

/// File name of the persisted revalidation metadata.
pub const METADATA_FILE: &str = "metadata.json";

/// Bundled bootstrap asset for first-launch offline use.
const BUNDLED_DEVICES: &str = include_str!("../assets/devices.json");

/// Which table seeds the store before the first successful refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BootstrapTable {
    /// Copy the bundled `devices.json` into place on first run.
    #[default]
    Bundled,
    /// Start from an empty table (pure identifier passthrough) until the
    /// first refresh lands.
    Empty,
}

/// Store configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Cache directory override (tests, CLI `--data-dir`). `None` resolves
    /// the platform default.
    pub root: Option<PathBuf>,
    /// First-run seeding behavior.
    pub bootstrap: BootstrapTable,
}

/// Filesystem-backed implementation of [`TableStorePort`].
pub struct FsTableStore {
    config: StoreConfig,
}

impl FsTableStore {
    /// Create a store over the configured cache directory.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// The resolved cache directory.
    pub fn root(&self) -> Result<PathBuf, StoreError> {
        match &self.config.root {
            Some(root) => Ok(root.clone()),
            None => paths::data_root(),
        }
    }

    /// Parse the bundled asset, or `None` when bootstrap is `Empty` or the
    /// asset itself is invalid.
    fn bundled_document(&self) -> Option<TableDocument> {
        match self.config.bootstrap {
            BootstrapTable::Empty => None,
            BootstrapTable::Bundled => match serde_json::from_str(BUNDLED_DEVICES) {
                Ok(document) => Some(document),
                Err(error) => {
                    tracing::error!(%error, "Bundled table asset is invalid");
                    None
                }
            },
        }
    }

    /// Seed table + metadata from the bundled asset, writing it into the
    /// cache directory when one is available.
    fn bootstrap(&self, root: Option<&Path>) -> StoredTable {
        let Some(document) = self.bundled_document() else {
            return StoredTable::default();
        };
        let metadata = CacheMetadata::initial();

        if let Some(root) = root {
            if let Err(error) = self.write_both(root, &document, &metadata) {
                tracing::warn!(%error, "Failed to seed cache directory; continuing in memory");
            } else {
                tracing::debug!(root = %root.display(), "Seeded cache from bundled asset");
            }
        }

        StoredTable {
            table: LookupTable::from(&document),
            metadata,
        }
    }

    fn write_both(
        &self,
        root: &Path,
        document: &TableDocument,
        metadata: &CacheMetadata,
    ) -> Result<(), StoreError> {
        ensure_dir(root)?;
        atomic_write_json(&paths::table_path(root), document, "table")?;
        atomic_write_json(&paths::metadata_path(root), metadata, "metadata")?;
        Ok(())
    }
}

#[async_trait]
impl TableStorePort for FsTableStore {
    async fn load(&self) -> StoredTable {
        let root = match self.root() {
            Ok(root) => root,
            Err(error) => {
                tracing::warn!(%error, "Cache directory unavailable; using bootstrap table in memory");
                return self.bootstrap(None);
            }
        };

        let table_path = paths::table_path(&root);
        match read_document(&table_path) {
            Ok(Some(document)) => StoredTable {
                table: LookupTable::from(&document),
                metadata: read_metadata(&paths::metadata_path(&root)),
            },
            Ok(None) => {
                tracing::debug!(path = %table_path.display(), "No cached table; seeding");
                self.bootstrap(Some(root.as_path()))
            }
            Err(error) => {
                // Last-known-good is gone; the bundled default is the best
                // remaining source, so reseed over the bad file.
                tracing::warn!(%error, path = %table_path.display(), "Cached table unreadable; reseeding");
                self.bootstrap(Some(root.as_path()))
            }
        }
    }

    async fn persist_table(
        &self,
        document: &TableDocument,
        metadata: &CacheMetadata,
    ) -> Result<(), StorePortError> {
        let root = self.root().map_err(|e| e.into_port_error("table"))?;
        self.write_both(&root, document, metadata)
            .map_err(|e| e.into_port_error("table"))
    }

    async fn persist_metadata(&self, metadata: &CacheMetadata) -> Result<(), StorePortError> {
        let root = self.root().map_err(|e| e.into_port_error("metadata"))?;
        ensure_dir(&root).map_err(|e| e.into_port_error("metadata"))?;
        atomic_write_json(&paths::metadata_path(&root), metadata, "metadata")
            .map_err(|e| e.into_port_error("metadata"))
    }
}

fn ensure_dir(root: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::CreateFailed {
        path: root.to_path_buf(),
        source,
    })
}

/// Read and parse the persisted document. `Ok(None)` when the file does not
/// exist; `Err` for unreadable or unparsable content.
fn read_document(path: &Path) -> Result<Option<TableDocument>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::ReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the metadata sidecar; missing or corrupt metadata degrades to the
/// zeroed default (which makes the next check due immediately).
fn read_metadata(path: &Path) -> CacheMetadata {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(metadata) => metadata,
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "Cache metadata unreadable; resetting");
                CacheMetadata::default()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => CacheMetadata::default(),
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "Cache metadata unreadable; resetting");
            CacheMetadata::default()
        }
    }
}

/// Write a JSON document atomically: serialize, write `<file>.tmp`, rename.
fn atomic_write_json<T: Serialize>(
    path: &Path,
    value: &T,
    what: &'static str,
) -> Result<(), StoreError> {
    let json =
        serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize { what, source })?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &json).map_err(|source| StoreError::WriteFailed {
        path: temp_path.clone(),
        source,
    })?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(|source| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

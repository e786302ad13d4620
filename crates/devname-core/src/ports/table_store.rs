//! Cache store port definition.

use async_trait::async_trait;
use thiserror::Error;

use crate::contracts::TableDocument;
use crate::domain::{CacheMetadata, LookupTable};

/// Errors from persisting cache state.
///
/// Load failures never surface here: `load` degrades to a safe fallback and
/// reports problems as diagnostics only.
#[derive(Debug, Error)]
pub enum StorePortError {
    /// The cache location could not be resolved or created.
    #[error("cache location unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// Writing a cache file failed.
    #[error("failed to write {what}: {message}")]
    WriteFailed {
        /// Which file was being written (`"table"` or `"metadata"`).
        what: &'static str,
        /// Description of the failure.
        message: String,
    },
}

/// Table and metadata loaded from the store.
#[derive(Debug, Clone, Default)]
pub struct StoredTable {
    /// The table snapshot to publish at startup.
    pub table: LookupTable,
    /// Revalidation metadata persisted alongside it.
    pub metadata: CacheMetadata,
}

/// Port for the persisted copy of the lookup table and its revalidation
/// metadata.
///
/// Implementations must replace the on-disk document atomically with respect
/// to concurrent readers: a reader sees either the old or the new file in
/// full, never a torn write.
#[async_trait]
pub trait TableStorePort: Send + Sync {
    /// Load the persisted table, seeding the store location from the bundled
    /// default on first run.
    ///
    /// Never fails by contract: missing or corrupt state degrades to the
    /// bundled default, then to an empty table, with diagnostics only.
    async fn load(&self) -> StoredTable;

    /// Persist a freshly fetched document together with its metadata.
    async fn persist_table(
        &self,
        document: &TableDocument,
        metadata: &CacheMetadata,
    ) -> Result<(), StorePortError>;

    /// Persist metadata alone (a "not modified" revalidation advanced the
    /// check timestamp without changing the table).
    async fn persist_metadata(&self, metadata: &CacheMetadata) -> Result<(), StorePortError>;
}

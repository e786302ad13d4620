//! Filesystem-backed cache store for devname.
//!
//! Persists the lookup table document and its revalidation metadata under an
//! app-private data directory, seeds both from the bundled default asset on
//! first run, and replaces files atomically so concurrent readers never see
//! a torn write.

mod error;
mod paths;
mod store;

pub use error::StoreError;
pub use paths::{DATA_DIR_ENV, data_root, metadata_path, table_path};
pub use store::{BootstrapTable, FsTableStore, METADATA_FILE, StoreConfig, TABLE_FILE};

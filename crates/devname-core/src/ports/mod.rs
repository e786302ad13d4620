//! Port traits connecting the core to its collaborators.
//!
//! The core stays pure and testable by depending on these seams only:
//!
//! - `IdentifierProviderPort` - host identifier + device-class hint
//!   (implemented by the CLI via sysinfo, or a static value)
//! - `TableStorePort` - persisted table and revalidation metadata
//!   (implemented by `devname-store`)
//! - `TableFetchPort` - conditional remote fetch
//!   (implemented by `devname-http`)

mod identifier_provider;
mod table_fetch;
mod table_store;

pub use identifier_provider::{IdentifierProviderPort, StaticProvider};
pub use table_fetch::{FetchOutcome, FetchPortError, TableFetchPort};
pub use table_store::{StorePortError, StoredTable, TableStorePort};

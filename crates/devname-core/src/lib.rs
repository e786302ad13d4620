//! Core domain types, ports, and the resolution engine for devname.
//!
//! This crate owns the pure parts of the system: the lookup-table domain
//! model, the wire contract for the table document, the port traits the
//! adapters implement, the resolution algorithm, and the
//! [`DeviceNameService`] that publishes table snapshots and keeps them
//! fresh. No adapter-specific dependencies (HTTP client, filesystem paths,
//! host probing) are allowed here.

pub mod contracts;
pub mod domain;
pub mod ports;
pub mod resolve;
pub mod service;

// Re-export commonly used types for convenience
pub use contracts::{ModelFields, TableDocument};
pub use domain::{CacheMetadata, DeviceClass, LookupTable, ModelEntry, Validator};
pub use ports::{
    FetchOutcome, FetchPortError, IdentifierProviderPort, StaticProvider, StorePortError,
    StoredTable, TableFetchPort, TableStorePort,
};
pub use resolve::{ResolveOptions, display_name, simulator_label};
pub use service::{DeviceNameService, NamingConfig, REFRESH_COOLDOWN, RefreshOutcome};

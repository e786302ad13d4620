//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together:
//! the filesystem store (devname-store), the conditional fetcher
//! (devname-http), and the host identifier provider are instantiated here
//! and injected into the core service. Command handlers receive the
//! composed context and delegate to it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use devname_core::{DeviceClass, DeviceNameService, NamingConfig};
use devname_http::{FetchConfig, ReqwestTableFetcher};
use devname_store::{FsTableStore, StoreConfig};

use crate::host::HostIdentifierProvider;

/// Bootstrap configuration assembled from CLI flags and environment.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Cache directory override.
    pub data_dir: Option<PathBuf>,
    /// Remote endpoint override.
    pub endpoint: Option<String>,
    /// Device-class hint for the host provider.
    pub device_class: DeviceClass,
    /// Treat `arm`-prefixed identifiers as simulator markers.
    pub arm_is_simulator: bool,
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The resolution service.
    pub service: DeviceNameService,
    /// Resolved cache directory, if one could be determined.
    pub data_root: Option<PathBuf>,
}

/// Wire the concrete adapters into the core service.
pub async fn bootstrap(options: BootstrapOptions) -> Result<CliContext> {
    let store = FsTableStore::new(StoreConfig {
        root: options.data_dir,
        ..StoreConfig::default()
    });
    let data_root = store.root().ok();

    let mut fetch_config = FetchConfig::default();
    if let Some(endpoint) = options.endpoint {
        fetch_config.endpoint = endpoint;
    }
    let fetcher = ReqwestTableFetcher::new(&fetch_config)
        .with_context(|| format!("invalid remote endpoint {:?}", fetch_config.endpoint))?;

    let provider = HostIdentifierProvider::new(options.device_class);

    let config = NamingConfig {
        arm_is_simulator: options.arm_is_simulator,
        ..NamingConfig::default()
    };
    let service = DeviceNameService::load(
        Arc::new(store),
        Arc::new(fetcher),
        Arc::new(provider),
        config,
    )
    .await;

    tracing::debug!(
        data_root = ?data_root,
        endpoint = %fetch_config.endpoint,
        "Composed devname service"
    );
    Ok(CliContext { service, data_root })
}

//! Device-name service: published table snapshot plus refresh orchestration.
//!
//! The service owns the process-wide state the resolver reads: an atomically
//! published [`LookupTable`] snapshot, the revalidation metadata, and the
//! single in-flight check guard. Collaborators are injected as ports, so the
//! whole refresh cycle is testable with fakes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::Utc;

use crate::domain::{CacheMetadata, LookupTable};
use crate::ports::{
    FetchOutcome, FetchPortError, IdentifierProviderPort, TableFetchPort, TableStorePort,
};
use crate::resolve::{self, ResolveOptions};

/// Default cool-down between remote revalidation attempts.
pub const REFRESH_COOLDOWN: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Service tuning.
#[derive(Debug, Clone)]
pub struct NamingConfig {
    /// Minimum interval between remote revalidation attempts. Triggers
    /// inside the window are ignored silently.
    pub refresh_cooldown: Duration,
    /// Treat `arm`-prefixed identifiers as simulator markers (simulator
    /// builds only).
    pub arm_is_simulator: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            refresh_cooldown: REFRESH_COOLDOWN,
            arm_is_simulator: false,
        }
    }
}

/// Outcome of a foreground refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new table was published and persisted.
    Updated,
    /// Remote content unchanged; only the check timestamp advanced.
    NotModified,
    /// The cool-down window has not elapsed.
    SkippedCooldown,
    /// Another check is already in flight.
    AlreadyChecking,
}

/// Resolves identifiers against the published snapshot and keeps the
/// snapshot fresh.
///
/// Cheap to clone; clones share the same published state.
#[derive(Clone)]
pub struct DeviceNameService {
    inner: Arc<Inner>,
}

struct Inner {
    /// Published table snapshot. Replaced wholesale; readers take a full
    /// snapshot at entry and never block on the writer.
    table: ArcSwap<LookupTable>,
    /// Published revalidation metadata, replaced by the in-flight check.
    metadata: ArcSwap<CacheMetadata>,
    /// The one shared mutable flag: set while a check is in flight.
    checking: AtomicBool,
    store: Arc<dyn TableStorePort>,
    fetcher: Arc<dyn TableFetchPort>,
    provider: Arc<dyn IdentifierProviderPort>,
    config: NamingConfig,
}

/// Scope guard that clears the in-flight flag on drop.
///
/// This ensures the flag is released exactly once on every exit path of a
/// check (success, not-modified, parse failure, network failure).
struct CheckGuard<'a> {
    checking: &'a AtomicBool,
}

impl<'a> CheckGuard<'a> {
    /// Claim the in-flight slot; `None` if a check is already running.
    fn try_acquire(checking: &'a AtomicBool) -> Option<Self> {
        checking
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then_some(Self { checking })
    }
}

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        self.checking.store(false, Ordering::SeqCst);
    }
}

impl DeviceNameService {
    /// Load the persisted snapshot and construct the service.
    pub async fn load(
        store: Arc<dyn TableStorePort>,
        fetcher: Arc<dyn TableFetchPort>,
        provider: Arc<dyn IdentifierProviderPort>,
        config: NamingConfig,
    ) -> Self {
        let stored = store.load().await;
        tracing::debug!(
            families = stored.table.family_count(),
            models = stored.table.model_count(),
            "Loaded lookup table"
        );
        Self {
            inner: Arc::new(Inner {
                table: ArcSwap::from_pointee(stored.table),
                metadata: ArcSwap::from_pointee(stored.metadata),
                checking: AtomicBool::new(false),
                store,
                fetcher,
                provider,
                config,
            }),
        }
    }

    /// Resolve an identifier to a display name. Never fails.
    ///
    /// `None` asks the identifier provider for the host identifier. Every
    /// call also signals a background refresh; the signal never alters this
    /// call's result, which uses the snapshot current at entry.
    pub fn resolve(&self, identifier: Option<&str>, include_type: bool) -> String {
        let table = self.inner.table.load_full();
        let owned;
        let identifier = match identifier {
            Some(identifier) => identifier,
            None => {
                owned = self.inner.provider.identifier();
                owned.as_str()
            }
        };
        let opts = ResolveOptions {
            include_type,
            arm_is_simulator: self.inner.config.arm_is_simulator,
        };
        let name = resolve::display_name(&table, identifier, self.inner.provider.device_class(), opts);
        self.trigger_refresh();
        name
    }

    /// The host device's display name: `resolve(None, true)`.
    pub fn display_name(&self) -> String {
        self.resolve(None, true)
    }

    /// Snapshot of the currently published table.
    pub fn table(&self) -> Arc<LookupTable> {
        self.inner.table.load_full()
    }

    /// Snapshot of the current revalidation metadata.
    pub fn metadata(&self) -> Arc<CacheMetadata> {
        self.inner.metadata.load_full()
    }

    /// Foreground conditional refresh.
    ///
    /// `force` bypasses the cool-down window but never the in-flight guard.
    pub async fn refresh(&self, force: bool) -> Result<RefreshOutcome, FetchPortError> {
        self.inner.run_check(force).await
    }

    /// Fire-and-forget refresh if one is due.
    ///
    /// Requires an ambient tokio runtime; without one the trigger is
    /// skipped. Either way the caller is never blocked.
    fn trigger_refresh(&self) {
        if self.inner.checking.load(Ordering::SeqCst) || !self.inner.due_for_check() {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no async runtime available; skipping background refresh");
            return;
        };
        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            match inner.run_check(false).await {
                Ok(outcome) => tracing::debug!(?outcome, "Background refresh finished"),
                Err(error) => tracing::warn!(%error, "Background refresh failed"),
            }
        });
    }
}

impl Inner {
    /// Whether the cool-down window has elapsed since the last check.
    ///
    /// A last-checked timestamp in the future (clock skew) counts as not
    /// due; the window re-opens once the clock catches up.
    fn due_for_check(&self) -> bool {
        match self.metadata.load().last_checked_at {
            None => true,
            Some(at) => Utc::now()
                .signed_duration_since(at)
                .to_std()
                .is_ok_and(|elapsed| elapsed >= self.config.refresh_cooldown),
        }
    }

    async fn run_check(&self, force: bool) -> Result<RefreshOutcome, FetchPortError> {
        let Some(_guard) = CheckGuard::try_acquire(&self.checking) else {
            return Ok(RefreshOutcome::AlreadyChecking);
        };
        if !force && !self.due_for_check() {
            return Ok(RefreshOutcome::SkippedCooldown);
        }

        let validator = self.metadata.load().validator.clone();
        match self.fetcher.fetch(validator.as_ref()).await {
            Ok(FetchOutcome::NotModified) => {
                let metadata = CacheMetadata {
                    validator,
                    last_checked_at: Some(Utc::now()),
                };
                self.metadata.store(Arc::new(metadata.clone()));
                if let Err(error) = self.store.persist_metadata(&metadata).await {
                    tracing::warn!(%error, "Failed to persist revalidation metadata");
                }
                tracing::debug!("Remote table unchanged");
                Ok(RefreshOutcome::NotModified)
            }
            Ok(FetchOutcome::Updated {
                document,
                validator,
            }) => {
                let table = LookupTable::from(&document);
                let metadata = CacheMetadata {
                    validator,
                    last_checked_at: Some(Utc::now()),
                };
                tracing::info!(
                    families = table.family_count(),
                    models = table.model_count(),
                    "Publishing refreshed lookup table"
                );
                self.table.store(Arc::new(table));
                self.metadata.store(Arc::new(metadata.clone()));
                if let Err(error) = self.store.persist_table(&document, &metadata).await {
                    tracing::warn!(%error, "Failed to persist refreshed table; serving from memory");
                }
                Ok(RefreshOutcome::Updated)
            }
            // Parse and transport failures share one path: table, validator
            // and last-checked all stay untouched, so the next natural
            // trigger retries instead of waiting out the cool-down.
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::TableDocument;
    use crate::domain::{DeviceClass, Validator};
    use crate::ports::{StaticProvider, StorePortError, StoredTable};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn sample_document() -> TableDocument {
        serde_json::from_str(
            r#"{
                "deviceTypes": { "iPhone": "iPhone" },
                "devices": { "iPhone": [ { "10,3": { "name": "X" } } ] }
            }"#,
        )
        .unwrap()
    }

    fn replacement_document() -> TableDocument {
        serde_json::from_str(
            r#"{
                "deviceTypes": { "iPhone": "iPhone", "iPad": "iPad" },
                "devices": {
                    "iPhone": [ { "10,3": { "name": "X" } }, { "11,2": { "name": "XS" } } ],
                    "iPad": [ { "7,3": { "name": "Pro (10.5 inch)", "type": "Wi-Fi" } } ]
                }
            }"#,
        )
        .unwrap()
    }

    #[derive(Default)]
    struct FakeStore {
        stored: StoredTable,
        fail_persist: bool,
        persisted_tables: Mutex<Vec<(TableDocument, CacheMetadata)>>,
        persisted_metadata: Mutex<Vec<CacheMetadata>>,
    }

    impl FakeStore {
        fn with_stored(stored: StoredTable) -> Self {
            Self {
                stored,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl TableStorePort for FakeStore {
        async fn load(&self) -> StoredTable {
            self.stored.clone()
        }

        async fn persist_table(
            &self,
            document: &TableDocument,
            metadata: &CacheMetadata,
        ) -> Result<(), StorePortError> {
            if self.fail_persist {
                return Err(StorePortError::WriteFailed {
                    what: "table",
                    message: "disk full".to_string(),
                });
            }
            self.persisted_tables
                .lock()
                .unwrap()
                .push((document.clone(), metadata.clone()));
            Ok(())
        }

        async fn persist_metadata(&self, metadata: &CacheMetadata) -> Result<(), StorePortError> {
            if self.fail_persist {
                return Err(StorePortError::WriteFailed {
                    what: "metadata",
                    message: "disk full".to_string(),
                });
            }
            self.persisted_metadata.lock().unwrap().push(metadata.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeFetcher {
        // One scripted response per expected call, consumed in order.
        responses: Mutex<Vec<Result<FetchOutcome, FetchPortError>>>,
        seen_validators: Mutex<Vec<Option<Validator>>>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn scripted(responses: Vec<Result<FetchOutcome, FetchPortError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                ..Self::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TableFetchPort for FakeFetcher {
        async fn fetch(
            &self,
            validator: Option<&Validator>,
        ) -> Result<FetchOutcome, FetchPortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_validators
                .lock()
                .unwrap()
                .push(validator.cloned());
            let mut responses = self.responses.lock().unwrap();
            assert!(!responses.is_empty(), "unexpected fetch call");
            responses.remove(0)
        }
    }

    async fn service_with(
        store: Arc<FakeStore>,
        fetcher: Arc<FakeFetcher>,
        config: NamingConfig,
    ) -> DeviceNameService {
        let provider = Arc::new(StaticProvider::new("iPhone10,3", DeviceClass::Phone));
        DeviceNameService::load(store, fetcher, provider, config).await
    }

    fn stored_sample() -> StoredTable {
        StoredTable {
            table: LookupTable::from(&sample_document()),
            metadata: CacheMetadata::initial(),
        }
    }

    #[tokio::test]
    async fn resolve_uses_the_loaded_snapshot() {
        let store = Arc::new(FakeStore::with_stored(stored_sample()));
        // A check is due (never checked); script a failure so state is untouched.
        let fetcher = Arc::new(FakeFetcher::scripted(vec![Err(
            FetchPortError::Network {
                message: "offline".to_string(),
            },
        )]));
        let service = service_with(store, fetcher, NamingConfig::default()).await;

        assert_eq!(service.resolve(Some("iPhone10,3"), true), "iPhone X");
        assert_eq!(service.resolve(None, true), "iPhone X");
        assert_eq!(service.display_name(), "iPhone X");
    }

    #[tokio::test]
    async fn not_modified_advances_timestamp_but_keeps_the_snapshot() {
        let mut stored = stored_sample();
        stored.metadata.validator = Some(Validator::ETag("\"v1\"".to_string()));
        let store = Arc::new(FakeStore::with_stored(stored));
        let fetcher = Arc::new(FakeFetcher::scripted(vec![Ok(FetchOutcome::NotModified)]));
        let service = service_with(Arc::clone(&store), Arc::clone(&fetcher), NamingConfig::default()).await;

        let before = service.table();
        let outcome = service.refresh(false).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::NotModified);

        // Identical snapshot, not merely an equal one.
        assert!(Arc::ptr_eq(&before, &service.table()));

        let metadata = service.metadata();
        assert!(metadata.last_checked_at.is_some());
        assert_eq!(
            metadata.validator,
            Some(Validator::ETag("\"v1\"".to_string()))
        );

        // The stored validator was presented on the conditional request.
        assert_eq!(
            fetcher.seen_validators.lock().unwrap()[0],
            Some(Validator::ETag("\"v1\"".to_string()))
        );

        // Metadata alone was persisted.
        assert_eq!(store.persisted_metadata.lock().unwrap().len(), 1);
        assert!(store.persisted_tables.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn updated_publishes_and_persists_the_new_table() {
        let store = Arc::new(FakeStore::with_stored(stored_sample()));
        let fetcher = Arc::new(FakeFetcher::scripted(vec![Ok(FetchOutcome::Updated {
            document: replacement_document(),
            validator: Some(Validator::ETag("\"v2\"".to_string())),
        })]));
        let service = service_with(Arc::clone(&store), fetcher, NamingConfig::default()).await;

        let outcome = service.refresh(false).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Updated);

        // New snapshot is live for subsequent resolutions.
        assert_eq!(
            service.resolve(Some("iPad7,3"), true),
            "iPad Pro (10.5 inch) (Wi-Fi)"
        );
        assert_eq!(
            service.metadata().validator,
            Some(Validator::ETag("\"v2\"".to_string()))
        );

        let persisted = store.persisted_tables.lock().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].0, replacement_document());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_all_state_untouched() {
        let mut stored = stored_sample();
        stored.metadata.validator = Some(Validator::LastModified("yesterday".to_string()));
        let store = Arc::new(FakeStore::with_stored(stored));
        let fetcher = Arc::new(FakeFetcher::scripted(vec![Err(
            FetchPortError::InvalidDocument {
                message: "trailing comma".to_string(),
            },
        )]));
        let service = service_with(Arc::clone(&store), fetcher, NamingConfig::default()).await;

        let before = service.table();
        let error = service.refresh(false).await.unwrap_err();
        assert!(matches!(error, FetchPortError::InvalidDocument { .. }));

        assert!(Arc::ptr_eq(&before, &service.table()));
        let metadata = service.metadata();
        // last_checked_at deliberately not advanced: the next natural
        // trigger retries rather than waiting out the cool-down.
        assert!(metadata.last_checked_at.is_none());
        assert_eq!(
            metadata.validator,
            Some(Validator::LastModified("yesterday".to_string()))
        );
        assert!(store.persisted_metadata.lock().unwrap().is_empty());
        assert!(store.persisted_tables.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cooldown_suppresses_checks_until_forced() {
        let mut stored = stored_sample();
        stored.metadata.last_checked_at = Some(Utc::now());
        let store = Arc::new(FakeStore::with_stored(stored));
        let fetcher = Arc::new(FakeFetcher::scripted(vec![Ok(FetchOutcome::NotModified)]));
        let service = service_with(store, Arc::clone(&fetcher), NamingConfig::default()).await;

        let outcome = service.refresh(false).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::SkippedCooldown);
        assert_eq!(fetcher.call_count(), 0);

        let outcome = service.refresh(true).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::NotModified);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn elapsed_cooldown_makes_a_check_due_again() {
        let mut stored = stored_sample();
        stored.metadata.last_checked_at =
            Some(Utc::now() - chrono::Duration::days(8));
        let store = Arc::new(FakeStore::with_stored(stored));
        let fetcher = Arc::new(FakeFetcher::scripted(vec![Ok(FetchOutcome::NotModified)]));
        let service = service_with(store, Arc::clone(&fetcher), NamingConfig::default()).await;

        let outcome = service.refresh(false).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::NotModified);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn second_check_is_a_noop_while_one_is_in_flight() {
        let store = Arc::new(FakeStore::with_stored(stored_sample()));
        let fetcher = Arc::new(FakeFetcher::default());
        let service = service_with(store, Arc::clone(&fetcher), NamingConfig::default()).await;

        // Simulate an in-flight check holding the guard.
        service.inner.checking.store(true, Ordering::SeqCst);
        let outcome = service.refresh(true).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::AlreadyChecking);
        assert_eq!(fetcher.call_count(), 0);

        // Once released, checks run again.
        service.inner.checking.store(false, Ordering::SeqCst);
        fetcher
            .responses
            .lock()
            .unwrap()
            .push(Ok(FetchOutcome::NotModified));
        let outcome = service.refresh(true).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::NotModified);
    }

    #[tokio::test]
    async fn guard_is_released_after_a_failed_check() {
        let store = Arc::new(FakeStore::with_stored(stored_sample()));
        let fetcher = Arc::new(FakeFetcher::scripted(vec![
            Err(FetchPortError::Network {
                message: "timeout".to_string(),
            }),
            Ok(FetchOutcome::NotModified),
        ]));
        let service = service_with(store, fetcher, NamingConfig::default()).await;

        service.refresh(true).await.unwrap_err();
        assert!(!service.inner.checking.load(Ordering::SeqCst));

        let outcome = service.refresh(true).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::NotModified);
    }

    #[tokio::test]
    async fn persist_failure_still_serves_the_new_table() {
        let store = Arc::new(FakeStore {
            stored: stored_sample(),
            fail_persist: true,
            ..FakeStore::default()
        });
        let fetcher = Arc::new(FakeFetcher::scripted(vec![Ok(FetchOutcome::Updated {
            document: replacement_document(),
            validator: None,
        })]));
        let service = service_with(store, fetcher, NamingConfig::default()).await;

        let outcome = service.refresh(false).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Updated);
        assert_eq!(service.resolve(Some("iPhone11,2"), true), "iPhone XS");
    }
}

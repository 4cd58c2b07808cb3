//! Version-gated read-through over a [`ContentTransport`].

use crate::error::{CacheError, CacheResult};
use crate::resource::{Mutation, Resource};
use crate::store::CacheStore;
use crate::transport::ContentTransport;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Where a read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Cached copy whose version token matched the remote's.
    VerifiedCache,
    /// Cached copy served because the version check failed.
    OfflineFallback,
    /// Fetched from the remote on this call.
    FreshFetch,
}

impl Provenance {
    /// Returns true if the payload came from the cache.
    pub fn is_cached(&self) -> bool {
        !matches!(self, Provenance::FreshFetch)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::VerifiedCache => write!(f, "verified-cache"),
            Provenance::OfflineFallback => write!(f, "offline-fallback"),
            Provenance::FreshFetch => write!(f, "fresh-fetch"),
        }
    }
}

/// A payload together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRead {
    /// The payload.
    pub payload: Value,
    /// Where the payload was served from.
    pub provenance: Provenance,
}

impl CachedRead {
    fn new(payload: Value, provenance: Provenance) -> Self {
        Self {
            payload,
            provenance,
        }
    }

    /// Decodes the payload into `D`.
    pub fn decode<D: DeserializeOwned>(&self) -> CacheResult<D> {
        Ok(D::deserialize(&self.payload)?)
    }
}

/// Cache that serves remote reads, verified against the remote version token.
///
/// Misses and stale hits are fetched from the remote and returned at once;
/// the cache entry is written by a tracked background task. Call
/// [`VersionGatedCache::wait_for_refreshes`] to observe those writes or
/// [`VersionGatedCache::shutdown`] to cancel them.
pub struct VersionGatedCache<T> {
    store: CacheStore,
    transport: Arc<T>,
    refreshes: Mutex<JoinSet<()>>,
    shutdown_tx: watch::Sender<bool>,
}

impl<T> VersionGatedCache<T>
where
    T: ContentTransport + 'static,
{
    /// Creates a cache over `store` reading through `transport`.
    pub fn new(store: CacheStore, transport: Arc<T>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            store,
            transport,
            refreshes: Mutex::new(JoinSet::new()),
            shutdown_tx,
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Reads `resource`.
    ///
    /// A cached entry is served as verified only when its version token
    /// equals the remote's current token and its TTL has not elapsed. If the
    /// version token cannot be fetched at all, any cached entry is served as
    /// an offline fallback, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Transport`] when the resource has to be fetched
    /// and the fetch fails.
    pub async fn read(&self, resource: &Resource) -> CacheResult<CachedRead> {
        let key = resource.cache_key();
        let epoch = self.store.epoch();

        let cached = match self.store.get(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(key, error = %e, "cache lookup failed, reading through");
                None
            }
        };

        let mut current_version = None;
        if let Some(hit) = cached {
            match self.transport.fetch_version_token().await {
                Ok(current) if current == hit.version && hit.is_fresh => {
                    debug!(key, version = %current, "cache hit verified");
                    return Ok(CachedRead::new(hit.payload, Provenance::VerifiedCache));
                }
                Ok(current) => {
                    debug!(
                        key,
                        cached = %hit.version,
                        current = %current,
                        fresh = hit.is_fresh,
                        "cache entry stale"
                    );
                    current_version = Some(current);
                }
                Err(e) => {
                    warn!(key, error = %e, "version check failed, serving cached copy");
                    return Ok(CachedRead::new(hit.payload, Provenance::OfflineFallback));
                }
            }
        }

        let payload = self.transport.fetch_resource(resource).await?;
        self.spawn_refresh(key, payload.clone(), current_version, epoch);
        Ok(CachedRead::new(payload, Provenance::FreshFetch))
    }

    /// Reads `resource` and decodes the payload.
    pub async fn read_as<D: DeserializeOwned>(
        &self,
        resource: &Resource,
    ) -> CacheResult<(D, Provenance)> {
        let read = self.read(resource).await?;
        Ok((read.decode()?, read.provenance))
    }

    /// Removes every entry `mutation` affects.
    ///
    /// Refreshes already in flight for those keys are discarded.
    pub async fn invalidate_for(&self, mutation: &Mutation) -> CacheResult<()> {
        let keys: Vec<String> = mutation
            .affected_resources()
            .iter()
            .map(Resource::cache_key)
            .collect();
        self.store.invalidate(&keys).await?;
        info!(kind = ?mutation.kind(), ?keys, "cache invalidated");
        Ok(())
    }

    /// Waits until every background refresh spawned so far has finished.
    pub async fn wait_for_refreshes(&self) {
        let mut pending = std::mem::take(&mut *self.refreshes.lock());
        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    warn!(error = %e, "cache refresh task panicked");
                }
            }
        }
    }

    /// Cancels pending refreshes and waits for them to stop.
    pub async fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        self.wait_for_refreshes().await;
        debug!("cache refreshes stopped");
    }

    /// Returns the number of refresh tasks not yet reaped.
    pub fn pending_refreshes(&self) -> usize {
        self.refreshes.lock().len()
    }

    /// Records `payload` under `key` in a tracked task.
    ///
    /// `known_version` is a token fetched before the payload; when absent the
    /// task fetches the token itself. The write is dropped if anything was
    /// invalidated after `epoch`.
    fn spawn_refresh(
        &self,
        key: String,
        payload: Value,
        known_version: Option<String>,
        epoch: u64,
    ) {
        if *self.shutdown_tx.borrow() {
            debug!(key, "cache shut down, refresh skipped");
            return;
        }

        let store = self.store.clone();
        let transport = Arc::clone(&self.transport);
        let mut shutdown = self.shutdown_tx.subscribe();

        let mut refreshes = self.refreshes.lock();
        while refreshes.try_join_next().is_some() {}
        refreshes.spawn(async move {
            let refresh = async {
                let version = match known_version {
                    Some(version) => version,
                    None => transport.fetch_version_token().await?,
                };
                store
                    .set_unless_invalidated(epoch, &key, payload, &version)
                    .await?;
                Ok::<_, CacheError>(())
            };
            tokio::select! {
                result = refresh => {
                    if let Err(e) = result {
                        warn!(key, error = %e, "background cache refresh failed");
                    }
                }
                _ = shutdown.wait_for(|stop| *stop) => {
                    debug!(key, "background cache refresh cancelled");
                }
            }
        });
    }
}

impl<T> fmt::Debug for VersionGatedCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionGatedCache")
            .field("store", &self.store)
            .field("pending_refreshes", &self.refreshes.lock().len())
            .finish_non_exhaustive()
    }
}

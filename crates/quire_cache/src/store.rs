//! Persistent cache store.

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::entry::{CacheEntry, CacheHit};
use crate::error::CacheResult;
use quire_storage::{FileStore, KeyValueStore};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Persistent map from cache key to [`CacheEntry`].
///
/// Expired entries are never deleted on read; they stay available as an
/// offline fallback until overwritten or removed. Clones share the same
/// backend.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
    /// Bumped by every removal so pending refreshes can detect it.
    epoch: Arc<AtomicU64>,
}

impl CacheStore {
    /// Creates a store over an existing backend.
    pub fn new(backend: Arc<dyn KeyValueStore>, config: &CacheConfig) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            default_ttl: config.default_ttl,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Opens a file-backed store in `root/<namespace>`.
    pub async fn open(root: &Path, config: &CacheConfig) -> CacheResult<Self> {
        let backend = FileStore::open(root, &config.namespace).await?;
        Ok(Self::new(Arc::new(backend), config))
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the TTL applied by [`CacheStore::set`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the current invalidation epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Looks up `key`.
    ///
    /// An expired entry is still returned, flagged as not fresh. An entry
    /// that cannot be decoded reads as absent.
    pub async fn get(&self, key: &str) -> CacheResult<Option<CacheHit>> {
        let Some(bytes) = self.backend.get(key).await? else {
            return Ok(None);
        };
        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "unreadable cache entry ignored");
                return Ok(None);
            }
        };

        let is_fresh = !entry.is_expired(self.clock.now_millis());
        Ok(Some(CacheHit {
            payload: entry.payload,
            version: entry.version,
            stored_at: entry.stored_at,
            is_fresh,
        }))
    }

    /// Returns the raw entry under `key` without freshness evaluation.
    pub async fn entry(&self, key: &str) -> CacheResult<Option<CacheEntry>> {
        match self.backend.get(key).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes).ok()),
            None => Ok(None),
        }
    }

    /// Stores `payload` under `key` with the default TTL.
    pub async fn set(&self, key: &str, payload: Value, version: &str) -> CacheResult<()> {
        self.set_with_ttl(key, payload, version, self.default_ttl).await
    }

    /// Stores `payload` under `key` with an explicit TTL.
    pub async fn set_with_ttl(
        &self,
        key: &str,
        payload: Value,
        version: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        let entry = CacheEntry {
            payload,
            stored_at: self.clock.now_millis(),
            ttl_ms: ttl.as_millis() as u64,
            version: version.to_string(),
        };
        let bytes = serde_json::to_vec(&entry)?;
        self.backend.put(key, &bytes).await?;
        debug!(key, version, "cache entry stored");
        Ok(())
    }

    /// Stores `payload` unless something was removed since `epoch`.
    ///
    /// The epoch is checked again once the write has landed; if a removal ran
    /// while the write was in flight, the written entry is withdrawn. Returns
    /// false when the write was skipped or withdrawn.
    pub async fn set_unless_invalidated(
        &self,
        epoch: u64,
        key: &str,
        payload: Value,
        version: &str,
    ) -> CacheResult<bool> {
        if self.epoch() != epoch {
            debug!(key, "cache write skipped after invalidation");
            return Ok(false);
        }
        self.set(key, payload, version).await?;
        if self.epoch() != epoch {
            self.backend.remove(key).await?;
            debug!(key, "cache write withdrawn after concurrent invalidation");
            return Ok(false);
        }
        Ok(true)
    }

    /// Removes `key`. Removing a missing key succeeds.
    pub async fn remove(&self, key: &str) -> CacheResult<()> {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.backend.remove(key).await?;
        debug!(key, "cache entry removed");
        Ok(())
    }

    /// Removes every key in `keys`.
    pub async fn invalidate<I, S>(&self, keys: I) -> CacheResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.remove(key.as_ref()).await?;
        }
        Ok(())
    }

    /// Removes every entry.
    pub async fn clear(&self) -> CacheResult<()> {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.backend.clear().await?;
        debug!("cache cleared");
        Ok(())
    }

    /// Lists every cache key, sorted.
    pub async fn keys(&self) -> CacheResult<Vec<String>> {
        let mut keys = self.backend.keys().await?;
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("default_ttl", &self.default_ttl)
            .field("epoch", &self.epoch())
            .finish_non_exhaustive()
    }
}

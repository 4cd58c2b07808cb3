//! In-memory key-value store for testing.

use crate::backend::KeyValueStore;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory key-value store.
///
/// This store keeps all values in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral state that doesn't need to survive a restart
///
/// An optional byte quota makes it possible to exercise quota-exhaustion
/// paths without filling a disk.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across tasks.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    quota: Option<u64>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store with no quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that refuses writes once the stored values would
    /// exceed `limit` bytes in total.
    #[must_use]
    pub fn with_quota(limit: u64) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota: Some(limit),
        }
    }

    /// Returns the number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Overwrites a raw value without quota checks.
    ///
    /// Useful for planting corrupt records in tests.
    pub fn insert_raw(&self, key: impl Into<String>, value: Vec<u8>) {
        self.entries.write().insert(key.into(), value);
    }

    /// Returns the total size in bytes of all stored values.
    #[must_use]
    pub fn used_bytes(&self) -> u64 {
        self.entries
            .read()
            .values()
            .map(|v| v.len() as u64)
            .sum()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let mut entries = self.entries.write();

        if let Some(limit) = self.quota {
            let current: u64 = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let requested = current + value.len() as u64;
            if requested > limit {
                return Err(StorageError::QuotaExceeded { requested, limit });
            }
        }

        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.entries.write().clear();
        Ok(())
    }
}

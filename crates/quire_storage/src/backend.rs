//! Key-value store trait definition.

use crate::error::StorageResult;
use async_trait::async_trait;

/// A namespaced, persistent key-value store.
///
/// Stores are **opaque byte maps**. They provide simple operations for
/// reading, writing, and enumerating values. Callers own all value format
/// interpretation - stores do not understand cache entries or ciphertext.
///
/// # Invariants
///
/// - `put` replaces any previous value for the key
/// - `get` returns exactly the bytes last written for the key
/// - `remove` on a missing key succeeds and changes nothing
/// - `keys` lists every key currently present, in no guaranteed order
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot be read.
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`](crate::StorageError::QuotaExceeded)
    /// when the store has no room for the value, or an I/O error.
    async fn put(&self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Removes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails for a reason other than the
    /// key being absent.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Lists all keys present in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    async fn keys(&self) -> StorageResult<Vec<String>>;

    /// Removes every key from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if any value cannot be removed.
    async fn clear(&self) -> StorageResult<()>;
}

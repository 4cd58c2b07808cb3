//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// The write would exceed the space available to the store.
    #[error("storage quota exceeded: {requested} bytes requested, limit {limit}")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write.
        requested: u64,
        /// The configured or reported limit.
        limit: u64,
    },

    /// The key cannot be used by this store.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    /// Returns true if the failure was caused by running out of space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::StorageFull {
            // The filesystem does not tell us its limit.
            StorageError::QuotaExceeded {
                requested: 0,
                limit: 0,
            }
        } else {
            StorageError::Io(err)
        }
    }
}

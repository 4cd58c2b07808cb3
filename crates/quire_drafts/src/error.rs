//! Error types for the draft store.

use quire_storage::StorageError;
use thiserror::Error;

/// Result type for draft store operations.
pub type DraftResult<T> = Result<T, DraftError>;

/// Errors that can occur in draft store operations.
#[derive(Debug, Error)]
pub enum DraftError {
    /// The persistence layer has no room left for the record.
    #[error("local draft storage is full; delete old drafts or clear cached data and try again")]
    StorageFull {
        /// The underlying quota error.
        #[source]
        source: StorageError,
    },

    /// The draft could not be serialized or sealed.
    #[error("encryption failed: {message}")]
    EncryptionFailure {
        /// Description of the failure.
        message: String,
    },

    /// A record could not be opened.
    #[error("decryption failed: {message}")]
    DecryptionFailure {
        /// Description of the failure.
        message: String,
    },

    /// Key material has the wrong length.
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected key size.
        expected: usize,
        /// Actual key size.
        actual: usize,
    },

    /// Key derivation failed.
    #[error("key derivation failed: {message}")]
    KeyDerivation {
        /// Description of the failure.
        message: String,
    },

    /// Any other persistence failure.
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl DraftError {
    /// Creates an encryption failure error.
    pub fn encryption_failed(message: impl Into<String>) -> Self {
        Self::EncryptionFailure {
            message: message.into(),
        }
    }

    /// Creates a decryption failure error.
    pub fn decryption_failed(message: impl Into<String>) -> Self {
        Self::DecryptionFailure {
            message: message.into(),
        }
    }

    /// Creates an invalid key size error.
    pub fn invalid_key_size(actual: usize, expected: usize) -> Self {
        Self::InvalidKeySize { expected, actual }
    }
}

impl From<StorageError> for DraftError {
    fn from(err: StorageError) -> Self {
        if err.is_quota_exceeded() {
            DraftError::StorageFull { source: err }
        } else {
            DraftError::Storage(err)
        }
    }
}

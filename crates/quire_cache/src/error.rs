//! Error types for the cache and its transport.

use quire_storage::StorageError;
use thiserror::Error;

/// Result type for transport calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors reported by the transport collaborator.
///
/// A timeout is reported as [`TransportError::Unreachable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The remote could not be reached.
    #[error("remote unreachable: {0}")]
    Unreachable(String),

    /// The remote was reached but rejected the request.
    #[error("remote error {code}: {message}")]
    Remote {
        /// Status code reported by the remote.
        code: u16,
        /// Message reported by the remote.
        message: String,
    },
}

impl TransportError {
    /// Creates an unreachable error.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }

    /// Creates a remote rejection.
    pub fn remote(code: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Returns true if the remote could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Unreachable(_))
    }
}

/// Errors that can occur in cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Persistence failure.
    #[error("cache storage error: {0}")]
    Storage(#[from] StorageError),

    /// A payload could not be encoded or decoded.
    #[error("cache codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The remote failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl CacheError {
    /// Returns the transport error, if that is what this is.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            CacheError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        assert_eq!(
            TransportError::remote(409, "sha mismatch").to_string(),
            "remote error 409: sha mismatch"
        );
        assert!(TransportError::unreachable("timeout").is_unreachable());
        assert!(!TransportError::remote(500, "boom").is_unreachable());
    }

    #[test]
    fn cache_error_exposes_transport() {
        let err: CacheError = TransportError::remote(404, "missing").into();
        assert_eq!(err.as_transport(), Some(&TransportError::remote(404, "missing")));
        assert_eq!(err.to_string(), "remote error 404: missing");
    }
}

//! Error types for the article service.

use quire_cache::{CacheError, TransportError};
use quire_drafts::DraftError;
use thiserror::Error;
use uuid::Uuid;

/// Result type for article service operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in article service operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The cache failed for a reason other than the remote.
    #[error("cache error: {0}")]
    Cache(CacheError),

    /// The draft store failed.
    #[error("draft error: {0}")]
    Draft(#[from] DraftError),

    /// A remote payload did not have the expected shape.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// No draft with this id exists.
    #[error("draft not found: {0}")]
    DraftNotFound(Uuid),
}

impl From<CacheError> for SyncError {
    fn from(e: CacheError) -> Self {
        match e {
            CacheError::Transport(t) => SyncError::Transport(t),
            CacheError::Codec(c) => SyncError::Codec(c),
            other => SyncError::Cache(other),
        }
    }
}

impl SyncError {
    /// Returns true if the remote could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, SyncError::Transport(t) if t.is_unreachable())
    }

    /// Returns true if the remote reported the resource as missing.
    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, SyncError::Transport(TransportError::Remote { code: 404, .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_transport_errors_are_flattened() {
        let err: SyncError = CacheError::Transport(TransportError::unreachable("down")).into();
        assert!(err.is_unreachable());
        assert_eq!(err.to_string(), "transport error: remote unreachable: down");
    }

    #[test]
    fn not_found_detection() {
        let err: SyncError = TransportError::remote(404, "no such file").into();
        assert!(err.is_remote_not_found());
        assert!(!err.is_unreachable());

        let err: SyncError = TransportError::remote(500, "boom").into();
        assert!(!err.is_remote_not_found());
    }

    #[test]
    fn draft_not_found_display() {
        let id = Uuid::nil();
        assert_eq!(
            SyncError::DraftNotFound(id).to_string(),
            format!("draft not found: {id}")
        );
    }
}

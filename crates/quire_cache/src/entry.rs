//! Cache entry record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A persisted cache entry.
///
/// The key lives in the store, not in the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cached remote projection.
    pub payload: Value,
    /// Write time in epoch milliseconds.
    pub stored_at: u64,
    /// Time to live in milliseconds.
    pub ttl_ms: u64,
    /// Remote version token current when the entry was written.
    pub version: String,
}

impl CacheEntry {
    /// Returns true once the TTL has elapsed at `now`.
    ///
    /// A zero TTL is expired on the very next read.
    pub fn is_expired(&self, now: u64) -> bool {
        self.ttl_ms == 0 || now.saturating_sub(self.stored_at) > self.ttl_ms
    }
}

/// A cache lookup result.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    /// The cached payload.
    pub payload: Value,
    /// Version token stored with the payload.
    pub version: String,
    /// Write time in epoch milliseconds.
    pub stored_at: u64,
    /// False once the TTL has elapsed; the caller must re-validate.
    pub is_fresh: bool,
}

//! # Quire Cache
//!
//! Version-gated cache of remote content.
//!
//! This crate provides:
//! - A persistent cache store with per-entry TTL and version token
//! - The transport contract the cache reads through
//! - The read path that validates entries against the remote version token
//!   and falls back to the last-known-good copy when the remote is down
//! - Write-through invalidation of every key a mutation affects
//!
//! ## Read Path
//!
//! 1. Look up the entry; on a miss go to step 3
//! 2. Fetch the remote version token:
//!    - token matches and entry is within TTL: serve it as verified
//!    - token differs or TTL elapsed: go to step 3
//!    - remote unreachable: serve it as an offline fallback
//! 3. Fetch from the remote and return immediately; a tracked background
//!    task records the payload with the then-current version token
//!
//! ## Key Invariants
//!
//! - A cached payload is never served as verified unless its version token
//!   matches the remote's current token
//! - Stale data is substituted only when the version check itself fails
//! - A fetch failure always surfaces to the caller
//! - Background refreshes never surface errors; they are logged

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod entry;
mod error;
mod gated;
mod resource;
mod store;
mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use entry::{CacheEntry, CacheHit};
pub use error::{CacheError, CacheResult, TransportError, TransportResult};
pub use gated::{CachedRead, Provenance, VersionGatedCache};
pub use resource::{Mutation, MutationKind, Resource, ARTICLE_LIST_KEY};
pub use store::CacheStore;
pub use transport::{ContentTransport, MockTransport};

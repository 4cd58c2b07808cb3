//! # Quire Storage
//!
//! Key-value persistence backends for Quire.
//!
//! This crate provides the lowest-level storage abstraction. Stores are
//! **opaque byte maps** keyed by string - they do not interpret the values
//! they hold. The API cache and the draft store each own a separate store
//! instance, so their key spaces can never collide.
//!
//! ## Design Principles
//!
//! - Stores are simple async byte maps (get, put, remove, keys, clear)
//! - No knowledge of cache entries, drafts, or ciphertext layout
//! - Must be `Send + Sync` so handles can be shared behind an `Arc`
//! - Quota exhaustion is reported as a distinct error
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral state, with an optional quota
//! - [`FileStore`] - One file per key inside a namespace directory
//!
//! ## Example
//!
//! ```rust
//! use quire_storage::{InMemoryStore, KeyValueStore};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let store = InMemoryStore::new();
//!     store.put("articles", b"[]").await.unwrap();
//!     assert_eq!(store.get("articles").await.unwrap(), Some(b"[]".to_vec()));
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::KeyValueStore;
pub use error::{StorageError, StorageResult};
pub use file::{FileStore, MAX_INLINE_KEY_LEN};
pub use memory::InMemoryStore;

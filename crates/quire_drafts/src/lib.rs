//! # Quire Drafts
//!
//! Encrypted offline draft store.
//!
//! Drafts are documents created or edited locally that have not yet been
//! confirmed written to the remote repository. Each draft is serialized,
//! sealed with AES-256-GCM and stored as a self-contained record keyed by
//! its id. There is no separate index; [`DraftStore::list_all`] decrypts
//! every record.
//!
//! ## Key Invariants
//!
//! - A draft id is generated locally and never reused
//! - Renaming a draft changes its path, never its id
//! - A record that cannot be decrypted reads as absent
//! - Synced drafts are only removed by an explicit [`DraftStore::remove`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use quire_drafts::{DraftStore, EncryptionKey, LocalArticle};
//! use quire_storage::InMemoryStore;
//! use std::sync::Arc;
//!
//! let store = DraftStore::new(Arc::new(InMemoryStore::new()), EncryptionKey::generate());
//! let draft = LocalArticle::new("Hello", "# Hello", "src/posts/hello.md");
//! store.save(&draft).await?;
//! assert_eq!(store.load(draft.id).await?, Some(draft));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod article;
mod config;
mod crypto;
mod error;
mod store;

pub use article::{now_millis, DraftState, LocalArticle};
pub use config::DraftStoreConfig;
pub use crypto::{DraftCipher, EncryptionKey, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use error::{DraftError, DraftResult};
pub use store::DraftStore;

//! # Quire Sync
//!
//! Article service for the Quire content client.
//!
//! This crate ties the version-gated cache, the encrypted draft store and
//! the consistency comparator together:
//!
//! - Listing and article reads go through the cache and report where they
//!   were served from
//! - Saves, renames and deletes go to the remote, then invalidate every
//!   cache key the mutation affects
//! - Drafts can be reconciled against the remote copy and pushed
//!
//! No operation retries on its own. Remote failures surface as
//! [`SyncError::Transport`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod article;
mod config;
mod error;
mod service;

pub use article::{response_sha, DraftStatus, RemoteArticle};
pub use config::ServiceConfig;
pub use error::{SyncError, SyncResult};
pub use service::ArticleService;

// Re-export collaborator types callers need to build a service.
pub use quire_cache::{ContentTransport, Mutation, Provenance, Resource, TransportError};

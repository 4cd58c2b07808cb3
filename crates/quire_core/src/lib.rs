//! # Quire Core
//!
//! Pure building blocks shared by the Quire cache and draft layers.
//!
//! This crate provides:
//! - The virtual tree model of the remote content repository, with path
//!   lookup, child enumeration, node removal and natural ordering
//! - Path helpers for the slash-delimited virtual filesystem
//! - The consistency comparator that decides whether two document bodies
//!   differ substantively or only by whitespace and metadata drift
//!
//! Nothing in this crate performs I/O or suspends. Lookups that find nothing
//! return empty or absent results rather than errors.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod consistency;
pub mod path;
mod sort;
pub mod tree;

pub use consistency::{has_substantial_difference, log_consistency_check, ConsistencyOutcome};
pub use path::{join_path, normalize_path, parent_path, resolve_target_dir};
pub use sort::natural_cmp;
pub use tree::{sorted, Lookup, NodeKind, NodeSelector, Tree, TreeConfig, TreeNode};

/// Quire version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Path helpers for the virtual filesystem.
//!
//! Paths are forward-slash delimited and never carry a trailing slash,
//! except for the bare `/`.

use crate::tree::{NodeKind, TreeNode};

/// Normalizes separators to `/` and strips one trailing slash.
///
/// An empty path stays empty; `/` stays `/`.
pub fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    match normalized.strip_suffix('/') {
        Some(stripped) if normalized.len() > 1 => stripped.to_string(),
        _ => normalized,
    }
}

/// Returns the parent directory of `path`, or an empty string for a
/// top-level name.
pub fn parent_path(path: &str) -> String {
    let normalized = normalize_path(path);
    match normalized.rfind('/') {
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    }
}

/// Joins segments with `/`, normalizing each and dropping empty ones.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| normalize_path(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Picks the directory a new file or folder should be created in.
///
/// Nothing selected means the root; a selected folder is the target
/// itself; a selected file means its parent directory.
pub fn resolve_target_dir(selected: Option<&TreeNode>, root: &str) -> String {
    match selected {
        None => root.to_string(),
        Some(node) => match node.kind {
            NodeKind::Folder { .. } => normalize_path(&node.path),
            NodeKind::File => parent_path(&node.path),
        },
    }
}

//! Virtual tree of the remote content repository.
//!
//! The tree is built from the remote listing snapshot (or local mutations)
//! and is the shared addressing scheme for cache keys and drafts. Every
//! operation here is total over well-formed trees: lookups that find
//! nothing return [`Lookup::NotFound`], an empty slice, or `false`.
//!
//! ## Invariants assumed, not checked
//!
//! - A node's `path` is its parent's path plus one segment
//! - Paths are unique across the whole tree
//! - The graph is acyclic (guaranteed by ownership)

use crate::sort::natural_cmp;
use serde::{Deserialize, Serialize};

/// Paths that denote the root of the content tree by default.
pub const DEFAULT_ROOT_PATHS: [&str; 2] = ["src/posts", "src"];

/// Whether a node is a folder (with children) or a file.
///
/// Serialized with a `type` tag so it matches the remote listing shape:
/// `{"type": "folder", "children": [...]}` or `{"type": "file"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// A directory. Children are kept in display order.
    Folder {
        /// Child nodes.
        #[serde(default)]
        children: Vec<TreeNode>,
    },
    /// A document.
    File,
}

/// A node of the virtual tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Optional identifier (remote blob sha or local draft id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name, normally the last path segment.
    pub name: String,
    /// Unique slash-delimited address, without a trailing slash.
    pub path: String,
    /// Folder or file.
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Remote revision of the blob, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl TreeNode {
    /// Creates a file node named after the last segment of `path`.
    pub fn file(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: None,
            name: last_segment(&path).to_string(),
            path,
            kind: NodeKind::File,
            sha: None,
        }
    }

    /// Creates a folder node named after the last segment of `path`.
    pub fn folder(path: impl Into<String>, children: Vec<TreeNode>) -> Self {
        let path = path.into();
        Self {
            id: None,
            name: last_segment(&path).to_string(),
            path,
            kind: NodeKind::Folder { children },
            sha: None,
        }
    }

    /// Sets the node identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the remote revision.
    #[must_use]
    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    /// Returns true for folder nodes.
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Returns true for file nodes.
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    /// Returns the children of a folder, or an empty slice for a file.
    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File => &[],
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Identifies a node for removal by id, by path, or by either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSelector {
    /// Match nodes whose `id` equals this value.
    pub id: Option<String>,
    /// Match nodes whose `path` equals this value.
    pub path: Option<String>,
}

impl NodeSelector {
    /// Selects by identifier.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            path: None,
        }
    }

    /// Selects by path.
    pub fn by_path(path: impl Into<String>) -> Self {
        Self {
            id: None,
            path: Some(path.into()),
        }
    }

    /// Also match on `path`.
    #[must_use]
    pub fn or_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns true if `node` matches either given identifier.
    pub fn matches(&self, node: &TreeNode) -> bool {
        let by_id = match (&self.id, &node.id) {
            (Some(want), Some(have)) => want == have,
            _ => false,
        };
        let by_path = self.path.as_deref() == Some(node.path.as_str());
        by_id || by_path
    }
}

/// Result of resolving a path in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The path denotes the configured root; these are its children.
    Root(&'a [TreeNode]),
    /// A node with exactly this path.
    Node(&'a TreeNode),
    /// No node has this path.
    NotFound,
}

impl<'a> Lookup<'a> {
    /// Returns the node, if the lookup found one.
    pub fn node(self) -> Option<&'a TreeNode> {
        match self {
            Lookup::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns true if nothing was found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }
}

/// Configuration for a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Paths that resolve to the root children.
    pub root_paths: Vec<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_paths: DEFAULT_ROOT_PATHS.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

impl TreeConfig {
    /// Creates a configuration with the default root paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the root paths.
    #[must_use]
    pub fn with_root_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_paths = paths.into_iter().map(Into::into).collect();
        self
    }
}

/// A snapshot of the content tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    config: TreeConfig,
    children: Vec<TreeNode>,
}

impl Tree {
    /// Creates a tree with the default root paths.
    pub fn new(children: Vec<TreeNode>) -> Self {
        Self::with_config(TreeConfig::default(), children)
    }

    /// Creates a tree with the given configuration.
    pub fn with_config(config: TreeConfig, children: Vec<TreeNode>) -> Self {
        Self { config, children }
    }

    /// Returns the root children.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Replaces the whole snapshot.
    pub fn replace(&mut self, children: Vec<TreeNode>) {
        self.children = children;
    }

    /// Returns true if `path` denotes the root.
    pub fn is_root(&self, path: &str) -> bool {
        self.config.root_paths.iter().any(|root| root == path)
    }

    /// Resolves `path` to the root children, a node, or nothing.
    ///
    /// Non-root paths are found by depth-first search on exact path
    /// equality; the first structural match wins.
    pub fn find_by_path(&self, path: &str) -> Lookup<'_> {
        if self.is_root(path) {
            return Lookup::Root(&self.children);
        }
        find_in(&self.children, path).map_or(Lookup::NotFound, Lookup::Node)
    }

    /// Returns the children listed under `path`.
    ///
    /// Files and unknown paths have no children.
    pub fn children_of(&self, path: &str) -> &[TreeNode] {
        match self.find_by_path(path) {
            Lookup::Root(children) => children,
            Lookup::Node(node) => node.children(),
            Lookup::NotFound => &[],
        }
    }

    /// Detaches the first node matching `selector`, searching depth-first.
    ///
    /// Returns false if no node matches.
    pub fn remove(&mut self, selector: &NodeSelector) -> bool {
        remove_from(&mut self.children, selector)
    }
}

fn find_in<'a>(nodes: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }
        if let Some(found) = find_in(node.children(), path) {
            return Some(found);
        }
    }
    None
}

fn remove_from(nodes: &mut Vec<TreeNode>, selector: &NodeSelector) -> bool {
    for i in 0..nodes.len() {
        if selector.matches(&nodes[i]) {
            nodes.remove(i);
            return true;
        }
        if let NodeKind::Folder { children } = &mut nodes[i].kind {
            if remove_from(children, selector) {
                return true;
            }
        }
    }
    false
}

/// Returns a copy of `nodes` ordered by name.
///
/// Ordering is ascending, case-insensitive and numeric-aware (`"2"` before
/// `"10"`). The sort is stable and the input is left untouched.
pub fn sorted(nodes: &[TreeNode]) -> Vec<TreeNode> {
    let mut out = nodes.to_vec();
    out.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    out
}

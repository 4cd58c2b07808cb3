//! Tree command implementation.

use quire_core::{sorted, Tree, TreeNode};
use serde::Serialize;
use std::path::Path;

/// One child in the tree output.
#[derive(Debug, Serialize)]
pub struct ChildSummary {
    /// Display name.
    pub name: String,
    /// `folder` or `file`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Full path.
    pub path: String,
}

/// Returns the sorted children at `path`, or at the first root path.
pub fn children(tree: &Tree, path: Option<&str>) -> Vec<ChildSummary> {
    let path = path
        .or_else(|| tree.config().root_paths.first().map(String::as_str))
        .unwrap_or_default();
    sorted(tree.children_of(path))
        .into_iter()
        .map(|node| ChildSummary {
            kind: if node.is_folder() { "folder" } else { "file" },
            name: node.name,
            path: node.path,
        })
        .collect()
}

/// Runs the tree command.
pub fn run(listing: &Path, path: Option<&str>, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(listing)?;
    let nodes: Vec<TreeNode> = serde_json::from_slice(&bytes)?;
    let tree = Tree::new(nodes);
    let children = children(&tree, path);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&children)?),
        _ => {
            for child in &children {
                let marker = if child.kind == "folder" { "/" } else { "" };
                println!("{}{}", child.name, marker);
            }
        }
    }
    Ok(())
}

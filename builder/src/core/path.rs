//! Path splitting and lookup over the forest.
//!
//! Step paths (`src/app.js`) and node keys (`/src/app.js`) are related by
//! [`node_key`]: each segment is appended to the running prefix with a `/`.
//! Empty segments are kept, so `/a` maps to the keys `/` and `//a`.

use crate::tree::FileNode;

/// Split a step path into its segments. The empty path has no segments.
pub fn split_segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').collect()
}

/// Key of `segment` under the node keyed `prefix` (empty for the top level).
pub fn node_key(prefix: &str, segment: &str) -> String {
    format!("{prefix}/{segment}")
}

/// Find the node a step path resolves to.
pub fn find_node<'a>(forest: &'a [FileNode], path: &str) -> Option<&'a FileNode> {
    let segments = split_segments(path);
    let (last, parents) = segments.split_last()?;

    let mut siblings = forest;
    let mut prefix = String::new();
    for segment in parents {
        prefix = node_key(&prefix, segment);
        let folder = siblings.iter().find(|node| node.path == prefix)?;
        siblings = &folder.children;
    }

    let key = node_key(&prefix, last);
    siblings.iter().find(|node| node.path == key)
}

/// Every file node, depth-first in insertion order.
pub fn list_files(forest: &[FileNode]) -> Vec<&FileNode> {
    let mut files = Vec::new();
    for node in forest {
        collect_files(node, &mut files);
    }
    files
}

fn collect_files<'a>(node: &'a FileNode, files: &mut Vec<&'a FileNode>) {
    if !node.is_folder() {
        files.push(node);
        return;
    }
    for child in &node.children {
        collect_files(child, files);
    }
}

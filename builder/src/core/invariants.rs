//! Semantic invariants of a forest.

use crate::core::path::node_key;
use crate::tree::FileNode;
use std::collections::HashSet;

/// Check structural invariants:
/// - No duplicate paths among siblings
/// - Each node's path is its parent's path joined with its name
/// - Folders carry no content, files carry no children
pub fn validate_forest(forest: &[FileNode]) -> Vec<String> {
    let mut errors = Vec::new();
    validate_siblings(forest, "", &mut errors);
    errors
}

fn validate_siblings(siblings: &[FileNode], parent: &str, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for node in siblings {
        if !seen.insert(node.path.as_str()) {
            errors.push(format!("duplicate path '{}'", node.path));
        }
        validate_node(node, parent, errors);
    }
}

fn validate_node(node: &FileNode, parent: &str, errors: &mut Vec<String>) {
    let expected = node_key(parent, &node.name);
    if node.path != expected {
        errors.push(format!(
            "{}: path does not match name '{}' (expected '{}')",
            node.path, node.name, expected
        ));
    }

    if node.is_folder() {
        if node.content.is_some() {
            errors.push(format!("{}: folder must not carry content", node.path));
        }
        validate_siblings(&node.children, &node.path, errors);
    } else if !node.children.is_empty() {
        errors.push(format!("{}: file must not have children", node.path));
    }
}

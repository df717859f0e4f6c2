//! Projection of the forest into a sandbox mount descriptor.
//!
//! The wire shape is fixed by the sandbox's `mount` call:
//!
//! ```json
//! {"src": {"directory": {"app.js": {"file": {"contents": "..."}}}}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::FileNode;

/// Entries keyed by name. Ordered so rendered descriptors are stable.
pub type MountDescriptor = BTreeMap<String, MountEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountEntry {
    Directory(MountDescriptor),
    File(FileContents),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContents {
    pub contents: String,
}

impl MountEntry {
    pub fn file(contents: &str) -> Self {
        Self::File(FileContents {
            contents: contents.to_string(),
        })
    }
}

/// Project `forest` into a descriptor keyed by each node's name.
pub fn project(forest: &[FileNode]) -> MountDescriptor {
    forest
        .iter()
        .map(|node| (node.name.clone(), project_node(node)))
        .collect()
}

fn project_node(node: &FileNode) -> MountEntry {
    if node.is_folder() {
        MountEntry::Directory(project(&node.children))
    } else {
        MountEntry::file(node.content.as_deref().unwrap_or_default())
    }
}

/// Render a descriptor in its JSON wire form.
pub fn to_json(descriptor: &MountDescriptor) -> serde_json::Result<String> {
    serde_json::to_string(descriptor)
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// One entry in the project forest.
///
/// `path` always carries a leading `/` for root-level entries even though the
/// forest has no literal root node: `src/app.js` is stored as `/src/app.js`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

/// Ordered top-level nodes of a project.
pub type Forest = Vec<FileNode>;

impl FileNode {
    pub fn folder(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Folder,
            path: path.to_string(),
            content: None,
            children: Vec::new(),
        }
    }

    pub fn file(name: &str, path: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::File,
            path: path.to_string(),
            content: Some(content.to_string()),
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(FileNode::count_nodes).sum::<usize>()
    }
}

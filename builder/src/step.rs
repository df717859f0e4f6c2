//! Step records produced by the external step parser.

use serde::{Deserialize, Serialize};

/// Kind of file-system mutation a step describes.
///
/// Only [`StepKind::CreateFile`] is folded into the forest. The remaining
/// kinds are accepted on the wire but not acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    CreateFile,
    CreateFolder,
    EditFile,
    DeleteFile,
    RunScript,
}

/// Lifecycle of a step. Moves only from `Pending` to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
}

/// One instruction describing a single file-system mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub status: StepStatus,
    /// Literal file body for `CreateFile` / `EditFile`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Slash-delimited target path, e.g. `src/app/index.js`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Step {
    /// A pending `CreateFile` step writing `code` to `path`.
    pub fn create_file(id: u64, path: impl Into<String>, code: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id,
            title: format!("Create {path}"),
            description: String::new(),
            kind: StepKind::CreateFile,
            status: StepStatus::Pending,
            code: Some(code.into()),
            path: Some(path),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == StepStatus::Pending
    }

    /// True if the tree builder acts on this step in its current state.
    pub fn is_foldable(&self) -> bool {
        self.is_pending() && self.kind == StepKind::CreateFile
    }
}

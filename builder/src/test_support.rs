//! Test-only helpers for constructing forests, steps, and sandboxes.

use std::cell::RefCell;

use anyhow::{Result, anyhow};

use crate::core::mount::MountDescriptor;
use crate::io::sandbox::Sandbox;
use crate::step::{Step, StepKind, StepStatus};
use crate::tree::FileNode;

/// Create a file node keyed `path`, naming it after the last segment.
pub fn file(path: &str, content: &str) -> FileNode {
    FileNode::file(last_segment(path), path, content)
}

/// Create a folder node keyed `path` with the given children.
pub fn folder(path: &str, children: Vec<FileNode>) -> FileNode {
    FileNode {
        children,
        ..FileNode::folder(last_segment(path), path)
    }
}

/// Create a pending step of `kind` with no path or code.
pub fn step_of_kind(id: u64, kind: StepKind) -> Step {
    Step {
        id,
        title: format!("step {id}"),
        description: String::new(),
        kind,
        status: StepStatus::Pending,
        code: None,
        path: None,
    }
}

/// Create a `CreateFile` step with an explicit status.
pub fn create_file_with_status(id: u64, path: &str, code: &str, status: StepStatus) -> Step {
    Step {
        status,
        ..Step::create_file(id, path, code)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Sandbox that records every mounted descriptor.
#[derive(Default)]
pub struct RecordingSandbox {
    mounts: RefCell<Vec<MountDescriptor>>,
    fail: bool,
}

impl RecordingSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sandbox whose every mount fails.
    pub fn failing() -> Self {
        Self {
            mounts: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn mounts(&self) -> Vec<MountDescriptor> {
        self.mounts.borrow().clone()
    }

    pub fn mount_count(&self) -> usize {
        self.mounts.borrow().len()
    }
}

impl Sandbox for RecordingSandbox {
    fn mount(&self, descriptor: &MountDescriptor) -> Result<()> {
        if self.fail {
            return Err(anyhow!("scripted mount failure"));
        }
        self.mounts.borrow_mut().push(descriptor.clone());
        Ok(())
    }
}

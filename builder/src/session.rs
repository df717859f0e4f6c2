//! Orchestration for a single build session.
//!
//! A session owns the forest and the step list. Every batch of arriving
//! steps runs the same two-stage pipeline: fold the pending steps into the
//! latest forest, then project and mount the forest if it changed.

use std::mem;

use tracing::{debug, instrument, warn};

use crate::core::fold::fold_steps;
use crate::core::invariants::validate_forest;
use crate::core::mount::{MountDescriptor, project};
use crate::core::path::{find_node, list_files};
use crate::core::types::{FoldOutcome, FoldSummary};
use crate::io::config::BuilderConfig;
use crate::io::sandbox::{DirectorySandbox, Sandbox};
use crate::step::Step;
use crate::tree::{FileNode, Forest};

/// What happened to the sandbox after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountStatus {
    /// The forest did not change, so nothing was mounted.
    NotNeeded,
    /// A mount was due but no sandbox is attached yet.
    NoSandbox,
    Mounted,
    /// The sandbox rejected the mount. The fold itself still stands.
    Failed(String),
}

/// Result of one fold-and-mount pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub summary: FoldSummary,
    pub mount: MountStatus,
}

pub struct BuildSession<S> {
    remount_on_noop: bool,
    forest: Forest,
    steps: Vec<Step>,
    sandbox: Option<S>,
}

impl BuildSession<DirectorySandbox> {
    /// Start a session mounting into the configured sandbox directory.
    pub fn with_directory_sandbox(config: &BuilderConfig) -> Self {
        let mut session = Self::new(config);
        session.sandbox = Some(DirectorySandbox::from_config(&config.sandbox));
        session
    }
}

impl<S: Sandbox> BuildSession<S> {
    /// Start an empty session with no sandbox attached.
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            remount_on_noop: config.remount_on_noop,
            forest: Vec::new(),
            steps: Vec::new(),
            sandbox: None,
        }
    }

    /// Attach the mount target, mounting the current forest if there is one.
    pub fn attach_sandbox(&mut self, sandbox: S) -> MountStatus {
        self.sandbox = Some(sandbox);
        if self.forest.is_empty() {
            return MountStatus::NotNeeded;
        }
        self.mount_current()
    }

    /// Append a batch of steps and fold it into the forest.
    pub fn append_steps(&mut self, batch: impl IntoIterator<Item = Step>) -> RefreshOutcome {
        self.steps.extend(batch);
        self.refresh()
    }

    /// Fold pending steps into the latest forest and mount it if it changed.
    #[instrument(skip_all, fields(steps = self.steps.len()))]
    pub fn refresh(&mut self) -> RefreshOutcome {
        let FoldOutcome {
            forest,
            steps,
            summary,
        } = fold_steps(mem::take(&mut self.forest), mem::take(&mut self.steps));
        self.forest = forest;
        self.steps = steps;

        for conflict in &summary.conflicts {
            warn!(%conflict, "skipped conflicting step");
        }
        for error in validate_forest(&self.forest) {
            warn!(%error, "forest invariant violated");
        }
        debug!(
            completed = summary.completed.len(),
            created = summary.created.len(),
            updated = summary.updated.len(),
            "folded steps"
        );

        let due = summary.forest_changed() || (self.remount_on_noop && summary.changed());
        let mount = if due {
            self.mount_current()
        } else {
            MountStatus::NotNeeded
        };

        RefreshOutcome { summary, mount }
    }

    fn mount_current(&self) -> MountStatus {
        let Some(sandbox) = &self.sandbox else {
            debug!("no sandbox attached, deferring mount");
            return MountStatus::NoSandbox;
        };
        match sandbox.mount(&self.descriptor()) {
            Ok(()) => MountStatus::Mounted,
            Err(err) => {
                let message = format!("{err:#}");
                warn!(error = %message, "sandbox mount failed");
                MountStatus::Failed(message)
            }
        }
    }

    pub fn forest(&self) -> &[FileNode] {
        &self.forest
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn sandbox(&self) -> Option<&S> {
        self.sandbox.as_ref()
    }

    /// Project the current forest.
    pub fn descriptor(&self) -> MountDescriptor {
        project(&self.forest)
    }

    /// Look up a node by step path, e.g. for showing a file in an editor.
    pub fn find(&self, path: &str) -> Option<&FileNode> {
        find_node(&self.forest, path)
    }

    pub fn files(&self) -> Vec<&FileNode> {
        list_files(&self.forest)
    }
}

//! Shared deterministic types for builder core logic.

use crate::step::Step;
use crate::tree::Forest;

/// Summary of what a fold applied.
///
/// Lists are recorded in processing order so that repeated folds over the
/// same input produce identical summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldSummary {
    /// Ids of steps marked completed by this fold.
    pub completed: Vec<u64>,
    /// Keys of nodes created by this fold (folders and files).
    pub created: Vec<String>,
    /// Keys of existing files whose content was replaced with different text.
    pub updated: Vec<String>,
    /// One message per step skipped because of a file/folder collision.
    pub conflicts: Vec<String>,
}

impl FoldSummary {
    /// True if any step was folded (and therefore marked completed).
    pub fn changed(&self) -> bool {
        !self.completed.is_empty()
    }

    /// True if the forest differs from the one the fold started with.
    pub fn forest_changed(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty()
    }
}

/// Result of folding a batch of steps into a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldOutcome {
    pub forest: Forest,
    pub steps: Vec<Step>,
    pub summary: FoldSummary,
}

//! Incremental virtual file-system builder.
//!
//! Folds externally-parsed file creation steps into an in-memory project
//! forest and projects that forest into the mount descriptor a sandboxed
//! execution environment consumes. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (folding, projection, lookup).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting boundaries (config, step intake, sandboxes).
//!
//! [`session`] coordinates the two into the fold-then-mount pipeline run for
//! every arriving batch of steps.

pub mod core;
pub mod io;
pub mod logging;
pub mod session;
pub mod step;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tree;

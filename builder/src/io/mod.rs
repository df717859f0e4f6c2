//! I/O helpers at the builder's boundaries.

pub mod config;
pub mod sandbox;
pub mod step_batch;

//! Deterministic, pure logic shared by the builder.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! forests and return deterministic outputs suitable for tests.

pub mod fold;
pub mod invariants;
pub mod mount;
pub mod path;
pub mod types;

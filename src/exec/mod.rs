// src/exec/mod.rs

//! Build execution layer for watch mode.
//!
//! The runtime hands [`BuildRequest`](crate::engine::BuildRequest)s to an
//! [`ExecutorBackend`]. The production [`RealExecutorBackend`] runs the
//! matching [`BuildTask`](crate::tasks::BuildTask) in best-effort mode on a
//! background Tokio task and reports back with `TaskCompleted`; tests can
//! swap in a fake that never touches the filesystem.

pub mod backend;

pub use backend::{ExecutorBackend, RealExecutorBackend};

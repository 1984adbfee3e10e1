// src/engine/mod.rs

//! Orchestration engine for watch mode.
//!
//! This module ties together:
//! - the per-task run state (idle / running)
//! - the trigger queue (what happens when a change arrives while the same
//!   task is already building)
//! - the main runtime event loop that reacts to:
//!   - file-watch triggers
//!   - task completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

use crate::types::TaskKind;

/// Outcome of one task run as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    /// Number of files (or task-level errors) that failed.
    Failed(usize),
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, exit the runtime once every task is idle and there are no
    /// queued triggers. Watch mode leaves this off and only stops on
    /// shutdown.
    pub exit_when_idle: bool,
}

/// A single build the executor should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRequest {
    pub task: TaskKind,
    /// Monotonic id, unique per dispatched run.
    pub run_id: u64,
}

/// Events flowing into the runtime from watchers, executors, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A task should be (re)built.
    TaskTriggered {
        task: TaskKind,
        /// The changed file that caused the trigger.
        path: PathBuf,
    },
    /// A task run finished, successfully or not.
    TaskCompleted {
        task: TaskKind,
        outcome: TaskOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod queue;
pub mod runtime;

pub use self::core::{CoreRuntime, TaskState};
pub use event_handlers::{CoreCommand, CoreStep};
pub use queue::TriggerQueue;
pub use crate::types::TriggerWhileRunningBehaviour;
pub use runtime::Runtime;

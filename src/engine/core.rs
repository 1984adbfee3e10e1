// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - handing `BuildRequest`s to the executor
//! - handling Ctrl+C / shutdown
//!
//! The core is unit-testable without Tokio, channels, the filesystem or
//! any build pipeline.

use std::collections::BTreeMap;

use crate::engine::event_handlers::{handle_task_completion, handle_task_trigger, CoreStep};
use crate::engine::queue::TriggerQueue;
use crate::engine::{BuildRequest, RuntimeEvent, RuntimeOptions};
use crate::types::{TaskKind, TriggerWhileRunningBehaviour};

/// Run state of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    #[default]
    Idle,
    Running { run_id: u64 },
}

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    states: BTreeMap<TaskKind, TaskState>,
    queue: TriggerQueue,
    options: RuntimeOptions,
    next_run_id: u64,
}

impl CoreRuntime {
    pub fn new(
        behaviour: TriggerWhileRunningBehaviour,
        queue_length: usize,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            states: TaskKind::ALL.iter().map(|&k| (k, TaskState::Idle)).collect(),
            queue: TriggerQueue::new(behaviour, queue_length),
            options,
            next_run_id: 1,
        }
    }

    pub fn state_of(&self, task: TaskKind) -> TaskState {
        self.states.get(&task).copied().unwrap_or_default()
    }

    /// True when no task is running.
    pub fn is_idle(&self) -> bool {
        self.states.values().all(|s| *s == TaskState::Idle)
    }

    /// Expose queue emptiness (for tests).
    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::TaskTriggered { task, path } => handle_task_trigger(self, task, &path),
            RuntimeEvent::TaskCompleted { task, outcome } => {
                handle_task_completion(self, task, outcome)
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }

    /// Mark `task` running and allocate the request the executor gets.
    pub(crate) fn start(&mut self, task: TaskKind) -> BuildRequest {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.states.insert(task, TaskState::Running { run_id });
        BuildRequest { task, run_id }
    }

    pub(crate) fn finish(&mut self, task: TaskKind) {
        self.states.insert(task, TaskState::Idle);
    }

    pub(crate) fn queue_mut(&mut self) -> &mut TriggerQueue {
        &mut self.queue
    }
}

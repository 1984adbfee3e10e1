// src/engine/queue.rs

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::types::{TaskKind, TriggerWhileRunningBehaviour};

/// Re-runs requested while a task is already running.
///
/// Semantics:
/// - Each task has its own counter of pending re-runs; tasks never wait on
///   each other.
/// - `Coalesce` caps the counter at 1: any number of changes during a build
///   lead to exactly one follow-up build.
/// - `Queue` caps it at `max_runs` (the `queue_length` config value), dropping
///   triggers beyond that.
#[derive(Debug)]
pub struct TriggerQueue {
    behaviour: TriggerWhileRunningBehaviour,
    max_runs: usize,
    pending: BTreeMap<TaskKind, usize>,
}

impl TriggerQueue {
    /// Create a new queue with the given behaviour and maximum queued runs.
    ///
    /// `max_runs` is clamped to at least 1.
    pub fn new(behaviour: TriggerWhileRunningBehaviour, max_runs: usize) -> Self {
        Self {
            behaviour,
            max_runs: max_runs.max(1),
            pending: BTreeMap::new(),
        }
    }

    /// Returns true if there are no queued triggers for any task.
    pub fn is_empty(&self) -> bool {
        self.pending.values().all(|n| *n == 0)
    }

    /// Number of pending re-runs for `task`.
    pub fn pending(&self, task: TaskKind) -> usize {
        self.pending.get(&task).copied().unwrap_or(0)
    }

    pub fn behaviour(&self) -> TriggerWhileRunningBehaviour {
        self.behaviour
    }

    /// Record that `task` was triggered while it is running.
    pub fn record_trigger(&mut self, task: TaskKind) {
        let cap = match self.behaviour {
            TriggerWhileRunningBehaviour::Coalesce => 1,
            TriggerWhileRunningBehaviour::Queue => self.max_runs,
        };

        let count = self.pending.entry(task).or_insert(0);
        if *count >= cap {
            if self.behaviour == TriggerWhileRunningBehaviour::Queue {
                warn!(%task, max_runs = cap, "queue full; dropping trigger");
            } else {
                debug!(%task, "re-run already pending; coalescing trigger");
            }
            return;
        }

        *count += 1;
        debug!(%task, pending = *count, "queued re-run");
    }

    /// Consume one pending re-run of `task`, if any.
    pub fn take(&mut self, task: TaskKind) -> bool {
        match self.pending.get_mut(&task) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

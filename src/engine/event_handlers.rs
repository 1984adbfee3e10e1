// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, info, warn};

use crate::engine::core::{CoreRuntime, TaskState};
use std::path::Path;

use crate::engine::{BuildRequest, TaskOutcome};
use crate::types::TaskKind;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Hand this build to the executor.
    Dispatch(BuildRequest),
    /// Request that the process exits (only with `exit_when_idle`).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Handle a task trigger event.
///
/// - Idle task: start a run right away.
/// - Running task: record the trigger in the queue; the run is never
///   interrupted, so builds of one task never overlap.
pub fn handle_task_trigger(
    core: &mut CoreRuntime,
    task: TaskKind,
    path: &Path,
) -> CoreStep {
    match core.state_of(task) {
        TaskState::Idle => {
            let request = core.start(task);
            info!(%task, run_id = request.run_id, changed = %path.display(), "starting task");
            CoreStep::continue_with(vec![CoreCommand::Dispatch(request)])
        }
        TaskState::Running { run_id } => {
            debug!(
                %task,
                run_id,
                changed = %path.display(),
                "task already running; recording trigger"
            );
            core.queue_mut().record_trigger(task);
            CoreStep::continue_with(Vec::new())
        }
    }
}

/// Handle a task completion event.
///
/// Failures are reported and otherwise treated like successes: the task
/// goes back to idle and stays eligible for the next change.
pub fn handle_task_completion(
    core: &mut CoreRuntime,
    task: TaskKind,
    outcome: TaskOutcome,
) -> CoreStep {
    match outcome {
        TaskOutcome::Success => info!(%task, "task finished"),
        TaskOutcome::Failed(failed) => {
            warn!(%task, failed, "task finished with errors; waiting for the next change")
        }
    }

    if core.state_of(task) == TaskState::Idle {
        debug!(%task, "completion for a task that is not running; ignoring");
    }
    core.finish(task);

    let mut commands = Vec::new();
    if core.queue_mut().take(task) {
        let request = core.start(task);
        info!(%task, run_id = request.run_id, "starting queued re-run");
        commands.push(CoreCommand::Dispatch(request));
    }

    let mut keep_running = true;
    if core.options().exit_when_idle && core.is_idle() && core.queue_is_empty() {
        keep_running = false;
        commands.push(CoreCommand::RequestExit);
    }

    CoreStep {
        commands,
        keep_running,
    }
}

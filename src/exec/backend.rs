// src/exec/backend.rs

//! Pluggable executor backend abstraction.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::engine::{BuildRequest, RuntimeEvent, TaskOutcome};
use crate::errors::{BuildError, Result};
use crate::tasks::{FailurePolicy, TaskSet};

/// Trait abstracting how dispatched builds are executed.
///
/// Production code uses [`RealExecutorBackend`]; tests can provide their own
/// implementation that doesn't run real pipelines.
pub trait ExecutorBackend: Send {
    /// Start the given build.
    ///
    /// Implementations must eventually emit exactly one
    /// `RuntimeEvent::TaskCompleted` for the request, whatever happens to
    /// the build, and must not block the runtime while it runs.
    fn dispatch(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
pub struct RealExecutorBackend {
    tasks: TaskSet,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RealExecutorBackend {
    /// Create a new real executor backend, wiring it to the given runtime
    /// event sender.
    pub fn new(tasks: TaskSet, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { tasks, runtime_tx }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn dispatch(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let task = self.tasks.get(request.task).map(Arc::clone);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            let Some(task) = task else {
                return Err(BuildError::ConfigError(format!(
                    "task '{}' is not registered",
                    request.task
                )));
            };

            tokio::spawn(async move {
                let outcome = match Arc::clone(&task).run(FailurePolicy::BestEffort).await {
                    Ok(report) if report.is_success() => TaskOutcome::Success,
                    Ok(report) => TaskOutcome::Failed(report.failures.len()),
                    Err(err) => {
                        error!(
                            task = %request.task,
                            run_id = request.run_id,
                            error = %err,
                            "build could not run"
                        );
                        TaskOutcome::Failed(1)
                    }
                };

                if tx
                    .send(RuntimeEvent::TaskCompleted {
                        task: request.task,
                        outcome,
                    })
                    .await
                    .is_err()
                {
                    warn!(task = %request.task, "runtime gone before build completed");
                }
            });

            Ok(())
        })
    }
}

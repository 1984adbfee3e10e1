use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use build_tool::engine::{BuildRequest, RuntimeEvent, TaskOutcome};
use build_tool::errors::{BuildError, Result};
use build_tool::exec::ExecutorBackend;

/// A fake executor that:
/// - records every dispatched `BuildRequest`
/// - reports `TaskCompleted` with the next scripted outcome (default
///   `Success`), either immediately or only when the test releases it.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    dispatched: Arc<Mutex<Vec<BuildRequest>>>,
    outcomes: VecDeque<TaskOutcome>,
    deferred: Option<mpsc::UnboundedSender<(BuildRequest, TaskOutcome)>>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        dispatched: Arc<Mutex<Vec<BuildRequest>>>,
    ) -> Self {
        Self {
            runtime_tx,
            dispatched,
            outcomes: VecDeque::new(),
            deferred: None,
        }
    }

    /// Outcomes to report for the first dispatches, in order.
    pub fn with_outcomes(mut self, outcomes: impl IntoIterator<Item = TaskOutcome>) -> Self {
        self.outcomes = outcomes.into_iter().collect();
        self
    }

    /// Do not complete builds on our own; hand them to the returned receiver
    /// instead. The test completes a build by sending `TaskCompleted` itself.
    pub fn deferred(mut self) -> (Self, mpsc::UnboundedReceiver<(BuildRequest, TaskOutcome)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.deferred = Some(tx);
        (self, rx)
    }
}

impl ExecutorBackend for FakeExecutor {
    fn dispatch(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let dispatched = Arc::clone(&self.dispatched);
        let outcome = self.outcomes.pop_front().unwrap_or(TaskOutcome::Success);
        let deferred = self.deferred.clone();

        Box::pin(async move {
            dispatched.lock().unwrap().push(request);

            if let Some(deferred) = deferred {
                deferred
                    .send((request, outcome))
                    .map_err(|e| BuildError::Other(anyhow::anyhow!("{e}")))?;
                return Ok(());
            }

            // Complete from a separate task, like the real backend does, so
            // the runtime is never blocked on its own channel.
            tokio::spawn(async move {
                let _ = tx
                    .send(RuntimeEvent::TaskCompleted {
                        task: request.task,
                        outcome,
                    })
                    .await;
            });
            Ok(())
        })
    }
}

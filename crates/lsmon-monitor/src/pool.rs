//! Bounded fan-out of node tasks.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

/// Runs batches of tasks with a fixed concurrency ceiling and a full join.
///
/// Used twice per cycle: once for the classification fan-out and once for the
/// remediation fan-out. `run_all` only returns after every submitted task has
/// finished, so callers can treat it as a barrier between cycle phases.
#[derive(Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    /// Create a pool allowing at most `concurrent` tasks in flight.
    #[must_use]
    pub fn new(concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrent)),
        }
    }

    /// Run every task to completion and collect their outputs.
    ///
    /// A task's slot is freed on every exit path: the owned permit is dropped
    /// with the task, panics included. Panicked tasks are logged and their
    /// output omitted; the rest of the batch is unaffected.
    pub async fn run_all<F>(&self, tasks: Vec<F>) -> Vec<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let mut handles = Vec::with_capacity(tasks.len());
        for task in tasks {
            let semaphore = Arc::clone(&self.semaphore);
            handles.push(tokio::spawn(async move {
                // The semaphore is never closed, so acquire only fails if the
                // pool itself is gone.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("worker pool semaphore closed");
                task.await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for outcome in futures_util::future::join_all(handles).await {
            match outcome {
                Ok(value) => results.push(value),
                Err(e) => error!(error = %e, "worker task panicked"),
            }
        }
        results
    }
}

//! Background worker driving [`JobQueue::process_next`].

use super::JobQueue;
use crate::storage::ports::KeyValueStore;
use mockable::Clock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Control handle for the running worker task.
pub(crate) struct WorkerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl<S, C> JobQueue<S, C>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Spawns the background worker. Does nothing while one is running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) {
        let mut worker = self.worker.lock();
        if worker.as_ref().is_some_and(|handle| !handle.task.is_finished()) {
            return;
        }
        let token = CancellationToken::new();
        let task = tokio::spawn(run_worker(Arc::clone(self), token.clone()));
        *worker = Some(WorkerHandle { token, task });
    }

    /// Cancels the worker and waits for it to exit.
    ///
    /// A handler already running is allowed to finish and its outcome is
    /// recorded before this returns.
    pub async fn stop(&self) {
        let handle = self.worker.lock().take();
        let Some(WorkerHandle { token, task }) = handle else {
            return;
        };
        token.cancel();
        if let Err(err) = task.await {
            tracing::error!(error = %err, "job queue worker terminated abnormally");
        }
    }

    /// Returns `true` while the background worker is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.task.is_finished())
    }
}

async fn run_worker<S, C>(queue: Arc<JobQueue<S, C>>, token: CancellationToken)
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    tracing::info!("job queue worker started");
    while !token.is_cancelled() {
        match queue.process_next().await {
            Ok(Some(_)) => continue,
            Ok(None) => {}
            Err(err) => tracing::error!(error = %err, "job queue worker pass failed"),
        }
        tokio::select! {
            () = token.cancelled() => break,
            () = tokio::time::sleep(queue.config.poll_interval()) => {}
        }
    }
    tracing::info!("job queue worker stopped");
}

//! Persistent job queue service.

use super::JobQueueConfig;
use super::worker::WorkerHandle;
use crate::audit::ports::AuditLogger;
use crate::context::{Payload, into_payload};
use crate::error::{Classify, ErrorKind};
use crate::job_queue::{
    domain::{FailureOutcome, Job, JobId, JobView, QueueSnapshot, RestoredSnapshot},
    ports::JobHandler,
};
use crate::storage::ports::{KeyValueStore, StoreError};
use mockable::Clock;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Store key holding the queue snapshot.
pub const STATE_KEY: &str = "background_job_queue_state";

/// Store key receiving a snapshot blob that could not be decoded.
pub const CORRUPT_STATE_KEY: &str = "background_job_queue_state.corrupt";

const SYSTEM_ACTOR: &str = "system";

/// Errors surfaced by queue operations.
#[derive(Debug, Clone, Error)]
pub enum JobQueueError {
    /// The key-value store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The snapshot could not be encoded.
    #[error("failed to encode job queue snapshot: {0}")]
    Serialization(Arc<serde_json::Error>),
}

impl From<serde_json::Error> for JobQueueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}

impl Classify for JobQueueError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Persistence
    }
}

/// Result type for queue operations.
pub type JobQueueResult<T> = Result<T, JobQueueError>;

enum Outcome {
    Completed,
    Retry { attempts: u32, delay_seconds: u64 },
    Failed { attempts: u32, error: String },
}

/// Durable FIFO job queue with linear-backoff retries.
pub struct JobQueue<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    audit: Arc<dyn AuditLogger>,
    clock: Arc<C>,
    pub(super) config: JobQueueConfig,
    handlers: parking_lot::RwLock<HashMap<String, Arc<dyn JobHandler>>>,
    state: tokio::sync::Mutex<QueueSnapshot>,
    pub(super) worker: parking_lot::Mutex<Option<WorkerHandle>>,
}

impl<S, C> JobQueue<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Loads the persisted snapshot and repairs it.
    ///
    /// A blob that is not a snapshot is copied to [`CORRUPT_STATE_KEY`] and
    /// the queue starts empty. A blob the store cannot decode at all is
    /// handled the same way, with the decode error recorded in place of the
    /// blob.
    ///
    /// # Errors
    ///
    /// Returns [`JobQueueError::Store`] when the store cannot be read or the
    /// repaired snapshot cannot be written back.
    pub async fn open(
        store: Arc<S>,
        audit: Arc<dyn AuditLogger>,
        clock: Arc<C>,
        config: JobQueueConfig,
    ) -> JobQueueResult<Self> {
        let restored = match store.get(STATE_KEY).await {
            Ok(None) => RestoredSnapshot::default(),
            Ok(Some(raw)) => {
                let decoded = QueueSnapshot::restore(&raw);
                if decoded.corrupt {
                    quarantine(&*store, &*audit, &raw).await?;
                }
                decoded
            }
            Err(StoreError::Serialization(err)) => {
                let note = json!({"decode_error": err.to_string()});
                quarantine(&*store, &*audit, &note).await?;
                RestoredSnapshot {
                    dirty: true,
                    corrupt: true,
                    ..RestoredSnapshot::default()
                }
            }
            Err(err) => return Err(err.into()),
        };

        let queue = Self {
            store,
            audit,
            clock,
            config,
            handlers: parking_lot::RwLock::new(HashMap::new()),
            state: tokio::sync::Mutex::new(restored.snapshot),
            worker: parking_lot::Mutex::new(None),
        };

        if restored.dirty {
            let state = queue.state.lock().await;
            queue.persist(&state).await?;
            tracing::info!(
                dropped_jobs = restored.dropped_jobs,
                queued = state.queued_len(),
                "job queue snapshot repaired"
            );
            drop(state);
        }
        Ok(queue)
    }

    /// Registers the handler for `job_type`, replacing any previous one.
    pub fn register_handler(&self, job_type: impl Into<String>, handler: Arc<dyn JobHandler>) {
        self.handlers.write().insert(job_type.into(), handler);
    }

    /// Returns the registered job types, sorted.
    #[must_use]
    pub fn handler_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Adds a job to the back of the queue and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`JobQueueError`] when the snapshot cannot be persisted; the
    /// job is not kept in that case.
    pub async fn enqueue(
        &self,
        job_type: &str,
        payload: Payload,
        max_retries: u32,
    ) -> JobQueueResult<JobView> {
        let job = Job::new(job_type, payload, max_retries, &*self.clock);
        let view = job.view();
        {
            let mut state = self.state.lock().await;
            state.push(job);
            if let Err(err) = self.persist(&state).await {
                state.discard(view.id);
                return Err(err);
            }
        }

        tracing::info!(job_id = %view.id, job_type, "job enqueued");
        self.audit.security(
            "job_enqueued",
            SYSTEM_ACTOR,
            &into_payload(json!({"job_id": view.id, "job_type": job_type})),
        );
        Ok(view)
    }

    /// Returns the job with `id`, or `None` when unknown.
    pub async fn get_job(&self, id: JobId) -> Option<JobView> {
        self.state.lock().await.get(id).map(Job::view)
    }

    /// Returns every known job, oldest first.
    pub async fn list_jobs(&self) -> Vec<JobView> {
        self.state
            .lock()
            .await
            .jobs_oldest_first()
            .into_iter()
            .map(Job::view)
            .collect()
    }

    /// Runs one worker pass: claims the first eligible job, dispatches it
    /// and records the outcome.
    ///
    /// Returns `Ok(None)` when no job is eligible. Handler failures are
    /// recorded on the job, never returned.
    ///
    /// # Errors
    ///
    /// Returns [`JobQueueError`] when a transition cannot be persisted.
    pub async fn process_next(&self) -> JobQueueResult<Option<JobView>> {
        let (id, job_type, payload) = {
            let mut state = self.state.lock().await;
            let Some(id) = state.claim_next(&*self.clock) else {
                return Ok(None);
            };
            if let Err(err) = self.persist(&state).await {
                state.release(id);
                return Err(err);
            }
            let Some(job) = state.get(id) else {
                return Ok(None);
            };
            (id, job.job_type().to_owned(), job.payload().clone())
        };

        tracing::debug!(job_id = %id, job_type = %job_type, "dispatching job");
        self.audit.security(
            "job_started",
            SYSTEM_ACTOR,
            &into_payload(json!({"job_id": id, "job_type": job_type})),
        );

        let handler = self.handlers.read().get(&job_type).cloned();
        let result = match handler {
            Some(handler) => run_isolated(handler, payload).await,
            None => Err(format!("No handler registered for job type '{job_type}'.")),
        };

        let (view, outcome) = {
            let mut state = self.state.lock().await;
            let Some(job) = state.get_mut(id) else {
                return Ok(None);
            };
            let outcome = match result {
                Ok(output) => {
                    job.complete(output, &*self.clock);
                    Outcome::Completed
                }
                Err(error) => match job.fail(error.clone(), self.config.retry_base(), &*self.clock)
                {
                    FailureOutcome::Retry { attempts, delay } => Outcome::Retry {
                        attempts,
                        delay_seconds: delay.as_secs(),
                    },
                    FailureOutcome::Failed { attempts } => Outcome::Failed { attempts, error },
                },
            };
            let view = job.view();
            if matches!(outcome, Outcome::Retry { .. }) {
                state.requeue(id);
            }
            self.persist(&state).await?;
            (view, outcome)
        };

        self.report(&view, outcome);
        Ok(Some(view))
    }

    fn report(&self, view: &JobView, outcome: Outcome) {
        match outcome {
            Outcome::Completed => {
                tracing::info!(job_id = %view.id, job_type = %view.job_type, "job completed");
                self.audit.security(
                    "job_completed",
                    SYSTEM_ACTOR,
                    &into_payload(json!({"job_id": view.id})),
                );
            }
            Outcome::Retry {
                attempts,
                delay_seconds,
            } => {
                tracing::warn!(
                    job_id = %view.id,
                    attempts,
                    retry_delay_seconds = delay_seconds,
                    error = view.last_error.as_deref().unwrap_or_default(),
                    "job failed; retry scheduled"
                );
                self.audit.security(
                    "job_retry_scheduled",
                    SYSTEM_ACTOR,
                    &into_payload(json!({
                        "job_id": view.id,
                        "attempts": attempts,
                        "retry_delay_seconds": delay_seconds,
                    })),
                );
            }
            Outcome::Failed { attempts, error } => {
                tracing::warn!(job_id = %view.id, attempts, error = %error, "job failed permanently");
                self.audit.security(
                    "job_failed",
                    SYSTEM_ACTOR,
                    &into_payload(json!({"job_id": view.id, "attempts": attempts, "error": error})),
                );
            }
        }
    }

    async fn persist(&self, state: &QueueSnapshot) -> JobQueueResult<()> {
        let value = state.to_value(self.clock.utc())?;
        self.store.set(STATE_KEY, &value).await?;
        Ok(())
    }
}

/// Runs `handler` on its own task so a panic becomes an ordinary failure.
async fn run_isolated(handler: Arc<dyn JobHandler>, payload: Payload) -> Result<Payload, String> {
    let task = tokio::spawn(async move { handler.handle(&payload).await });
    match task.await {
        Ok(outcome) => outcome.map_err(|err| err.message().to_owned()),
        Err(err) if err.is_panic() => Err("Job handler panicked.".to_owned()),
        Err(err) => Err(format!("Job handler was cancelled: {err}")),
    }
}

async fn quarantine<S>(store: &S, audit: &dyn AuditLogger, blob: &Value) -> JobQueueResult<()>
where
    S: KeyValueStore + ?Sized,
{
    store.set(CORRUPT_STATE_KEY, blob).await?;
    tracing::error!(
        state_key = STATE_KEY,
        quarantine_key = CORRUPT_STATE_KEY,
        "job queue snapshot is corrupt; quarantined and starting empty"
    );
    audit.security(
        "job_queue_state_corrupt",
        SYSTEM_ACTOR,
        &into_payload(json!({
            "state_key": STATE_KEY,
            "quarantine_key": CORRUPT_STATE_KEY,
        })),
    );
    Ok(())
}

//! Job handler contract.

use crate::context::Payload;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Executes jobs of one type.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Runs the job described by `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`JobHandlerError`] to fail the attempt; the queue then
    /// retries or fails the job according to its retry budget.
    async fn handle(&self, payload: &Payload) -> Result<Payload, JobHandlerError>;
}

/// Failure reported by a job handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct JobHandlerError {
    message: String,
}

impl JobHandlerError {
    /// Creates an error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates an error from any displayable error.
    #[must_use]
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::new(err.to_string())
    }

    /// Returns the failure message recorded on the job.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// [`JobHandler`] backed by an async closure.
pub struct FnJobHandler<F, Fut> {
    func: F,
    _future: PhantomData<fn() -> Fut>,
}

#[async_trait]
impl<F, Fut> JobHandler for FnJobHandler<F, Fut>
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Payload, JobHandlerError>> + Send + 'static,
{
    async fn handle(&self, payload: &Payload) -> Result<Payload, JobHandlerError> {
        (self.func)(payload.clone()).await
    }
}

/// Adapts an async closure into a shareable [`JobHandler`].
pub fn handler_fn<F, Fut>(func: F) -> Arc<dyn JobHandler>
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Payload, JobHandlerError>> + Send + 'static,
{
    Arc::new(FnJobHandler {
        func,
        _future: PhantomData,
    })
}

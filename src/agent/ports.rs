//! Agent handler contract.

use crate::context::{ExecutionContext, Payload};
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Behaviour behind a registered agent.
#[async_trait]
pub trait AgentHandler: Send + Sync {
    /// Handles one request.
    ///
    /// # Errors
    ///
    /// Returns [`AgentHandlerError`] when the agent cannot produce a result.
    async fn run(&self, payload: Payload, context: &ExecutionContext)
    -> Result<Payload, AgentHandlerError>;
}

/// Failure reported by an agent handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AgentHandlerError {
    message: String,
}

impl AgentHandlerError {
    /// Creates an error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// [`AgentHandler`] backed by an async closure.
pub struct FnAgentHandler<F, Fut> {
    func: F,
    _future: PhantomData<fn() -> Fut>,
}

#[async_trait]
impl<F, Fut> AgentHandler for FnAgentHandler<F, Fut>
where
    F: Fn(Payload, ExecutionContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Payload, AgentHandlerError>> + Send + 'static,
{
    async fn run(
        &self,
        payload: Payload,
        context: &ExecutionContext,
    ) -> Result<Payload, AgentHandlerError> {
        (self.func)(payload, context.clone()).await
    }
}

/// Adapts an async closure into a shareable [`AgentHandler`].
pub fn handler_fn<F, Fut>(func: F) -> Arc<dyn AgentHandler>
where
    F: Fn(Payload, ExecutionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Payload, AgentHandlerError>> + Send + 'static,
{
    Arc::new(FnAgentHandler {
        func,
        _future: PhantomData,
    })
}

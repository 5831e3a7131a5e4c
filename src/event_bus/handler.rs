//! Subscriber contract.

use super::EventEnvelope;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Receives published events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handles one event. Failures must be dealt with inside the handler.
    async fn handle(&self, event: &EventEnvelope);
}

/// [`EventHandler`] backed by an async closure.
pub struct FnEventHandler<F, Fut> {
    func: F,
    _future: PhantomData<fn() -> Fut>,
}

#[async_trait]
impl<F, Fut> EventHandler for FnEventHandler<F, Fut>
where
    F: Fn(EventEnvelope) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, event: &EventEnvelope) {
        (self.func)(event.clone()).await;
    }
}

/// Adapts an async closure into a shareable [`EventHandler`].
pub fn handler_fn<F, Fut>(func: F) -> Arc<dyn EventHandler>
where
    F: Fn(EventEnvelope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(FnEventHandler {
        func,
        _future: PhantomData,
    })
}

//! Extension hook contract.

use crate::context::Payload;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Callback attached to an extension point.
#[async_trait]
pub trait ExtensionHook: Send + Sync {
    /// Observes the payload emitted at the extension point.
    async fn call(&self, payload: &Payload);
}

/// [`ExtensionHook`] backed by an async closure.
pub struct FnExtensionHook<F, Fut> {
    func: F,
    _future: PhantomData<fn() -> Fut>,
}

#[async_trait]
impl<F, Fut> ExtensionHook for FnExtensionHook<F, Fut>
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn call(&self, payload: &Payload) {
        (self.func)(payload.clone()).await;
    }
}

/// Adapts an async closure into a shareable [`ExtensionHook`].
pub fn hook_fn<F, Fut>(func: F) -> Arc<dyn ExtensionHook>
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(FnExtensionHook {
        func,
        _future: PhantomData,
    })
}

//! Shared fixtures for job queue unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::storage::adapters::InMemoryKeyValueStore;
use crate::storage::ports::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;

/// In-memory store whose reads and writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryKeyValueStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

fn unavailable() -> StoreError {
    StoreError::persistence(std::io::Error::other("store unavailable"))
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.inner.delete(key).await
    }
}

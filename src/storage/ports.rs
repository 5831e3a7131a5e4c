//! Key-value store contract.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for key-value store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// JSON document store addressed by string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Returns the value stored under `key`, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be read.
    async fn get_or(&self, key: &str, default: Value) -> StoreResult<Value> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the value cannot be written.
    async fn set(&self, key: &str, value: &Value) -> StoreResult<()>;

    /// Removes `key`. Returns `false` when nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing store cannot be modified.
    async fn delete(&self, key: &str) -> StoreResult<bool>;
}

/// Errors returned by key-value store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The key cannot be mapped onto the backing store.
    #[error("invalid store key: {0}")]
    InvalidKey(String),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps an encoding or decoding error.
    pub fn serialization(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Serialization(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

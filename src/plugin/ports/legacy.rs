//! Out-of-process plugin executor contract.

use crate::plugin::domain::LegacyPluginOutput;
use async_trait::async_trait;
use thiserror::Error;

/// Runs allowlisted plugin executables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LegacyExecutor: Send + Sync {
    /// Runs plugin `name` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginExecutionError`] when the run is rejected, times out or
    /// cannot be started. A non-zero exit is reported in the output instead.
    async fn execute(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<LegacyPluginOutput, PluginExecutionError>;
}

/// Failure reported by a plugin or plugin executor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PluginExecutionError {
    message: String,
}

impl PluginExecutionError {
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

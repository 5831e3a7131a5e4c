//! Agent framework errors.

use crate::agent::ports::AgentHandlerError;
use crate::error::{Classify, ErrorKind};
use thiserror::Error;

/// Errors returned by [`super::AgentFramework`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    /// The spec name is empty or blank.
    #[error("Agent name cannot be empty.")]
    EmptyName,

    /// No agent is registered under the name.
    #[error("Unknown agent '{0}'.")]
    UnknownAgent(String),

    /// The handler failed.
    #[error("Agent '{agent}' failed: {source}")]
    HandlerFailed {
        /// Agent name.
        agent: String,
        /// Handler failure.
        source: AgentHandlerError,
    },
}

impl Classify for AgentError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName => ErrorKind::Configuration,
            Self::UnknownAgent(_) => ErrorKind::NotFound,
            Self::HandlerFailed { .. } => ErrorKind::Execution,
        }
    }
}

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

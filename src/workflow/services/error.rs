//! Workflow engine errors.

use crate::agent::services::AgentError;
use crate::error::{Classify, ErrorKind};
use crate::plugin::services::PluginError;
use crate::workflow::domain::WorkflowDomainError;
use thiserror::Error;

/// Errors returned by [`super::WorkflowEngine`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// The definition name is empty or blank.
    #[error("Workflow name cannot be empty.")]
    EmptyName,

    /// No workflow is registered under the name.
    #[error("Unknown workflow '{0}'.")]
    UnknownWorkflow(String),

    /// A plugin step's `args` config is not a list.
    #[error("Workflow plugin step args must be a list.")]
    InvalidPluginArgs,

    /// A step failed validation while a host was building a definition.
    ///
    /// The engine itself never returns this: steps are validated when they
    /// are constructed. It lets host code that parses steps and registers
    /// workflows propagate both failures with `?`.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),

    /// An agent step failed.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// A plugin step failed.
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl Classify for WorkflowError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName | Self::InvalidPluginArgs | Self::Domain(_) => {
                ErrorKind::Configuration
            }
            Self::UnknownWorkflow(_) => ErrorKind::NotFound,
            Self::Agent(err) => err.kind(),
            Self::Plugin(err) => err.kind(),
        }
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

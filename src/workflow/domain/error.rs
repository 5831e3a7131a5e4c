//! Workflow domain validation errors.

use thiserror::Error;

/// Errors raised while building workflow definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The step kind is not one the engine can execute.
    #[error("Unsupported workflow step kind '{0}'.")]
    UnsupportedStepKind(String),
}

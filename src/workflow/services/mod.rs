//! Workflow registration and execution.

mod engine;
mod error;

pub use engine::{WORKFLOW_EVENT_SOURCE, WorkflowEngine};
pub use error::{WorkflowError, WorkflowResult};

//! Workflow definitions, steps and run results.

mod definition;
mod error;
mod result;
mod step;

pub use definition::WorkflowDefinition;
pub use error::WorkflowDomainError;
pub use result::{StepResult, WorkflowRunResult};
pub use step::{StepKind, WorkflowStep};

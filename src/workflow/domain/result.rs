//! Workflow run results.

use super::StepKind;
use crate::context::{Payload, into_payload};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Step identifier.
    pub id: String,
    /// Step kind.
    pub kind: StepKind,
    /// Step target.
    pub target: String,
    /// What the step produced.
    pub result: Payload,
}

impl StepResult {
    fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "kind": self.kind.as_str(),
            "target": self.target,
            "result": self.result,
        })
    }
}

/// Outcome of a completed workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRunResult {
    /// Workflow name.
    pub workflow: String,
    /// Workflow version.
    pub version: String,
    /// Correlation identifier of the run.
    pub request_id: String,
    /// Step outcomes in execution order.
    pub steps: Vec<StepResult>,
}

impl WorkflowRunResult {
    /// Returns the result as a payload map.
    #[must_use]
    pub fn to_payload(&self) -> Payload {
        let steps: Vec<Value> = self.steps.iter().map(StepResult::to_value).collect();
        into_payload(json!({
            "workflow": self.workflow,
            "version": self.version,
            "request_id": self.request_id,
            "steps": steps,
        }))
    }
}

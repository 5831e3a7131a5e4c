//! Workflow definitions.

use super::WorkflowStep;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named, versioned sequence of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    name: String,
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    steps: Vec<WorkflowStep>,
    #[serde(default)]
    extension_points: BTreeSet<String>,
}

impl WorkflowDefinition {
    /// Creates a definition without steps.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            steps: Vec::new(),
            extension_points: BTreeSet::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a step.
    #[must_use]
    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends several steps in order.
    #[must_use]
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = WorkflowStep>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Adds extension points the workflow participates in.
    #[must_use]
    pub fn with_extension_points<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extension_points.extend(points.into_iter().map(Into::into));
        self
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the workflow version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    /// Returns the extension points.
    #[must_use]
    pub const fn extension_points(&self) -> &BTreeSet<String> {
        &self.extension_points
    }
}

//! Workflow steps.

use super::WorkflowDomainError;
use crate::context::Payload;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// What a step does when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum StepKind {
    /// Publish an event on the bus.
    Event,
    /// Run a registered agent.
    Agent,
    /// Run a plugin through the plugin framework.
    Plugin,
    /// Do nothing.
    Noop,
}

impl StepKind {
    /// Returns the lowercase tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Agent => "agent",
            Self::Plugin => "plugin",
            Self::Noop => "noop",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = WorkflowDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "event" => Ok(Self::Event),
            "agent" => Ok(Self::Agent),
            "plugin" => Ok(Self::Plugin),
            "noop" => Ok(Self::Noop),
            other => Err(WorkflowDomainError::UnsupportedStepKind(other.to_owned())),
        }
    }
}

impl TryFrom<String> for StepKind {
    type Error = WorkflowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One step of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Step identifier, unique within its workflow.
    pub id: String,
    /// What the step does.
    pub kind: StepKind,
    /// Topic, agent name or plugin name, depending on `kind`.
    #[serde(default)]
    pub target: String,
    /// Step-specific settings.
    #[serde(default)]
    pub config: Payload,
}

impl WorkflowStep {
    /// Creates a step with an empty config.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: StepKind, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
            config: Payload::new(),
        }
    }

    /// Creates a step from a textual kind.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::UnsupportedStepKind`] for unknown kinds.
    pub fn parse(
        id: impl Into<String>,
        kind: &str,
        target: impl Into<String>,
    ) -> Result<Self, WorkflowDomainError> {
        Ok(Self::new(id, kind.parse()?, target))
    }

    /// Replaces the config.
    #[must_use]
    pub fn with_config(mut self, config: Payload) -> Self {
        self.config = config;
        self
    }

    /// Returns the step as a JSON object for hook payloads.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "kind": self.kind.as_str(),
            "target": self.target,
            "config": self.config,
        })
    }
}

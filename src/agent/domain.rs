//! Agent descriptions and run envelopes.

use crate::context::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Published description of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    name: String,
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    capabilities: BTreeSet<String>,
    #[serde(default)]
    extension_points: BTreeSet<String>,
}

impl AgentSpec {
    /// Creates a spec with no capabilities or extension points.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            capabilities: BTreeSet::new(),
            extension_points: BTreeSet::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds capability tags.
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities.extend(capabilities.into_iter().map(Into::into));
        self
    }

    /// Adds extension points the agent participates in.
    #[must_use]
    pub fn with_extension_points<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extension_points.extend(points.into_iter().map(Into::into));
        self
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the capability tags.
    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    /// Returns the extension points.
    #[must_use]
    pub const fn extension_points(&self) -> &BTreeSet<String> {
        &self.extension_points
    }
}

/// Outcome of a successful agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRunResult {
    /// Agent name.
    pub agent: String,
    /// Agent version.
    pub version: String,
    /// Handler output.
    pub result: Payload,
}

impl AgentRunResult {
    /// Returns the envelope as a payload map.
    #[must_use]
    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("agent".to_owned(), Value::String(self.agent.clone()));
        payload.insert("version".to_owned(), Value::String(self.version.clone()));
        payload.insert("result".to_owned(), Value::Object(self.result.clone()));
        payload
    }
}

//! Invocation context and the opaque payload map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque structured map used for job payloads, event payloads and results.
pub type Payload = Map<String, Value>;

/// Caller identity and correlation data shared by plugin, agent and
/// workflow invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Authenticated principal.
    pub actor: String,
    /// Role of the principal.
    pub role: String,
    /// Correlation identifier; may be empty.
    #[serde(default)]
    pub request_id: String,
    /// Git hosting provider the request originated from.
    #[serde(default = "default_git_provider")]
    pub git_provider: String,
    /// Owner of the OAuth grant, when the call is delegated.
    #[serde(default)]
    pub oauth_owner: Option<String>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Payload,
}

fn default_git_provider() -> String {
    "github".to_owned()
}

impl ExecutionContext {
    /// Creates a context for `actor` acting as `role`.
    #[must_use]
    pub fn new(actor: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            role: role.into(),
            request_id: String::new(),
            git_provider: default_git_provider(),
            oauth_owner: None,
            metadata: Payload::new(),
        }
    }

    /// Sets the correlation identifier.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Sets the git provider.
    #[must_use]
    pub fn with_git_provider(mut self, provider: impl Into<String>) -> Self {
        self.git_provider = provider.into();
        self
    }

    /// Sets the OAuth owner.
    #[must_use]
    pub fn with_oauth_owner(mut self, owner: impl Into<String>) -> Self {
        self.oauth_owner = Some(owner.into());
        self
    }

    /// Replaces the metadata map.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Payload) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Returns `base` with every entry of `overlay` inserted on top.
#[must_use]
pub fn merge_payloads(base: &Payload, overlay: &Payload) -> Payload {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Returns the entries of a JSON object, or an empty payload for any other
/// value.
#[must_use]
pub fn into_payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

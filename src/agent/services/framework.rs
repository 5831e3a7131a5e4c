//! Agent registry and runner.

use super::{AgentError, AgentResult};
use crate::agent::domain::{AgentRunResult, AgentSpec};
use crate::agent::ports::AgentHandler;
use crate::context::{ExecutionContext, Payload, into_payload};
use crate::event_bus::EventBus;
use parking_lot::RwLock;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Source label on events published by the framework.
pub const AGENT_EVENT_SOURCE: &str = "agent-framework";

type Entry = (AgentSpec, Arc<dyn AgentHandler>);

/// Registry of agents, each announced on the event bus when run.
pub struct AgentFramework {
    bus: Arc<EventBus>,
    agents: RwLock<HashMap<String, Entry>>,
}

impl AgentFramework {
    /// Creates an empty framework publishing to `bus`.
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            agents: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `handler` under `spec`, replacing any agent of that name.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::EmptyName`] when the name is blank.
    pub fn register_agent(&self, spec: AgentSpec, handler: Arc<dyn AgentHandler>) -> AgentResult<()> {
        if spec.name().trim().is_empty() {
            return Err(AgentError::EmptyName);
        }
        tracing::info!(agent = spec.name(), version = spec.version(), "agent registered");
        self.agents
            .write()
            .insert(spec.name().to_owned(), (spec, handler));
        Ok(())
    }

    /// Returns every registered spec, sorted by name.
    #[must_use]
    pub fn list_agents(&self) -> Vec<AgentSpec> {
        let mut specs: Vec<AgentSpec> = self
            .agents
            .read()
            .values()
            .map(|(spec, _)| spec.clone())
            .collect();
        specs.sort_by(|left, right| left.name().cmp(right.name()));
        specs
    }

    /// Runs agent `name` with `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownAgent`] when nothing is registered under
    /// `name` and [`AgentError::HandlerFailed`] when the handler fails.
    pub async fn run_agent(
        &self,
        name: &str,
        payload: Payload,
        context: &ExecutionContext,
    ) -> AgentResult<AgentRunResult> {
        let (spec, handler) = self
            .agents
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::UnknownAgent(name.to_owned()))?;

        self.bus
            .publish_from(
                "agent.started",
                into_payload(json!({
                    "agent": spec.name(),
                    "version": spec.version(),
                    "request_id": context.request_id,
                    "actor": context.actor,
                })),
                AGENT_EVENT_SOURCE,
            )
            .await;

        let result = match handler.run(payload, context).await {
            Ok(result) => result,
            Err(source) => {
                tracing::warn!(agent = name, error = %source, "agent failed");
                self.bus
                    .publish_from(
                        "agent.failed",
                        into_payload(json!({
                            "agent": spec.name(),
                            "version": spec.version(),
                            "request_id": context.request_id,
                            "error": source.message(),
                        })),
                        AGENT_EVENT_SOURCE,
                    )
                    .await;
                return Err(AgentError::HandlerFailed {
                    agent: name.to_owned(),
                    source,
                });
            }
        };

        let status = result
            .get("status")
            .cloned()
            .unwrap_or_else(|| json!("completed"));
        self.bus
            .publish_from(
                "agent.completed",
                into_payload(json!({
                    "agent": spec.name(),
                    "version": spec.version(),
                    "request_id": context.request_id,
                    "status": status,
                })),
                AGENT_EVENT_SOURCE,
            )
            .await;

        Ok(AgentRunResult {
            agent: spec.name().to_owned(),
            version: spec.version().to_owned(),
            result,
        })
    }
}

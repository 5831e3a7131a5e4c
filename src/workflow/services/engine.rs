//! Sequential workflow runner.

use super::{WorkflowError, WorkflowResult};
use crate::agent::services::AgentFramework;
use crate::context::{ExecutionContext, Payload, into_payload, merge_payloads};
use crate::event_bus::EventBus;
use crate::plugin::domain::{WORKFLOW_AFTER_STEP, WORKFLOW_BEFORE_STEP, permissions};
use crate::plugin::services::PluginFramework;
use crate::workflow::domain::{
    StepKind, StepResult, WorkflowDefinition, WorkflowRunResult, WorkflowStep,
};
use parking_lot::RwLock;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Source label on lifecycle events published by the engine.
pub const WORKFLOW_EVENT_SOURCE: &str = "workflow-engine";

/// Registry and runner for workflow definitions.
pub struct WorkflowEngine {
    bus: Arc<EventBus>,
    agents: Arc<AgentFramework>,
    plugins: Arc<PluginFramework>,
    workflows: RwLock<HashMap<String, WorkflowDefinition>>,
}

impl WorkflowEngine {
    /// Creates an engine dispatching steps to `agents` and `plugins`.
    #[must_use]
    pub fn new(
        bus: Arc<EventBus>,
        agents: Arc<AgentFramework>,
        plugins: Arc<PluginFramework>,
    ) -> Self {
        Self {
            bus,
            agents,
            plugins,
            workflows: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `definition`, replacing any workflow of that name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EmptyName`] when the name is blank.
    pub fn register_workflow(&self, definition: WorkflowDefinition) -> WorkflowResult<()> {
        if definition.name().trim().is_empty() {
            return Err(WorkflowError::EmptyName);
        }
        tracing::info!(
            workflow = definition.name(),
            version = definition.version(),
            steps = definition.steps().len(),
            "workflow registered"
        );
        self.workflows
            .write()
            .insert(definition.name().to_owned(), definition);
        Ok(())
    }

    /// Returns every registered definition, sorted by name.
    #[must_use]
    pub fn list_workflows(&self) -> Vec<WorkflowDefinition> {
        let mut definitions: Vec<WorkflowDefinition> =
            self.workflows.read().values().cloned().collect();
        definitions.sort_by(|left, right| left.name().cmp(right.name()));
        definitions
    }

    /// Runs workflow `name` with `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownWorkflow`] when nothing is registered
    /// under `name`; otherwise the error of the first failing step.
    pub async fn run_workflow(
        &self,
        name: &str,
        payload: &Payload,
        context: &ExecutionContext,
    ) -> WorkflowResult<WorkflowRunResult> {
        let workflow = self
            .workflows
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownWorkflow(name.to_owned()))?;

        self.bus
            .publish_from(
                "workflow.started",
                into_payload(json!({
                    "workflow": workflow.name(),
                    "version": workflow.version(),
                    "request_id": context.request_id,
                    "actor": context.actor,
                })),
                WORKFLOW_EVENT_SOURCE,
            )
            .await;

        let mut steps = Vec::with_capacity(workflow.steps().len());
        for step in workflow.steps() {
            let mut hook_payload = into_payload(json!({
                "workflow": workflow.name(),
                "step": step.to_value(),
                "request_id": context.request_id,
            }));
            self.plugins
                .emit_extension_point(WORKFLOW_BEFORE_STEP, &hook_payload)
                .await;

            tracing::debug!(workflow = name, step = %step.id, kind = %step.kind, "running workflow step");
            let result = match self.execute_step(&workflow, step, payload, context).await {
                Ok(result) => result,
                Err(err) => {
                    self.announce_failure(&workflow, step, context, &err).await;
                    return Err(err);
                }
            };

            hook_payload.insert("result".to_owned(), Value::Object(result.clone()));
            steps.push(StepResult {
                id: step.id.clone(),
                kind: step.kind,
                target: step.target.clone(),
                result,
            });
            self.plugins
                .emit_extension_point(WORKFLOW_AFTER_STEP, &hook_payload)
                .await;
        }

        let outcome = WorkflowRunResult {
            workflow: workflow.name().to_owned(),
            version: workflow.version().to_owned(),
            request_id: context.request_id.clone(),
            steps,
        };
        self.bus
            .publish_from("workflow.completed", outcome.to_payload(), WORKFLOW_EVENT_SOURCE)
            .await;
        tracing::info!(workflow = name, steps = outcome.steps.len(), "workflow completed");
        Ok(outcome)
    }

    async fn execute_step(
        &self,
        workflow: &WorkflowDefinition,
        step: &WorkflowStep,
        payload: &Payload,
        context: &ExecutionContext,
    ) -> WorkflowResult<Payload> {
        match step.kind {
            StepKind::Event => {
                let source = format!("workflow:{}", workflow.name());
                let envelope = self
                    .bus
                    .publish_from(&step.target, merge_payloads(payload, &step.config), &source)
                    .await;
                Ok(into_payload(json!({
                    "status": "published",
                    "event_id": envelope.id().to_string(),
                    "topic": envelope.topic(),
                })))
            }
            StepKind::Agent => {
                let outcome = self
                    .agents
                    .run_agent(&step.target, merge_payloads(payload, &step.config), context)
                    .await?;
                Ok(outcome.to_payload())
            }
            StepKind::Plugin => {
                let args = plugin_args(&step.config)?;
                let permission = step
                    .config
                    .get("required_permission")
                    .map_or_else(|| permissions::EXECUTE.to_owned(), stringify);
                Ok(self
                    .plugins
                    .run_plugin(&step.target, &args, context, &permission)
                    .await?)
            }
            StepKind::Noop => Ok(into_payload(json!({"status": "skipped"}))),
        }
    }

    async fn announce_failure(
        &self,
        workflow: &WorkflowDefinition,
        step: &WorkflowStep,
        context: &ExecutionContext,
        err: &WorkflowError,
    ) {
        tracing::warn!(workflow = workflow.name(), step = %step.id, error = %err, "workflow step failed");
        self.bus
            .publish_from(
                "workflow.failed",
                into_payload(json!({
                    "workflow": workflow.name(),
                    "version": workflow.version(),
                    "request_id": context.request_id,
                    "step": step.id,
                    "error": err.to_string(),
                })),
                WORKFLOW_EVENT_SOURCE,
            )
            .await;
    }
}

fn plugin_args(config: &Payload) -> WorkflowResult<Vec<String>> {
    match config.get("args") {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().map(stringify).collect()),
        Some(_) => Err(WorkflowError::InvalidPluginArgs),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

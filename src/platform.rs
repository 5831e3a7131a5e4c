//! Composition root wiring every orchestration component together.
//!
//! [`Platform`] owns one instance of each service and exposes the operations
//! a host (an HTTP layer, a CLI, a test) needs. Nothing here is global: build
//! as many platforms as you like, each with its own store, audit sink and
//! clock.

use crate::agent::domain::{AgentRunResult, AgentSpec};
use crate::agent::ports::AgentHandler;
use crate::agent::services::{AgentError, AgentFramework};
use crate::audit::adapters::TracingAuditLogger;
use crate::audit::ports::AuditLogger;
use crate::config::OrchestratorConfig;
use crate::context::{ExecutionContext, Payload};
use crate::error::{Classify, ErrorKind};
use crate::event_bus::{EventBus, EventEnvelope};
use crate::job_queue::domain::{JobId, JobView};
use crate::job_queue::ports::JobHandler;
use crate::job_queue::services::{JobQueue, JobQueueError};
use crate::plugin::adapters::HealthProbePlugin;
use crate::plugin::domain::{ExtensionPoint, PluginManifest};
use crate::plugin::ports::LegacyExecutor;
use crate::plugin::services::{PluginError, PluginFramework};
use crate::sandbox::PluginSandbox;
use crate::storage::adapters::InMemoryKeyValueStore;
use crate::storage::ports::KeyValueStore;
use crate::workflow::domain::{WorkflowDefinition, WorkflowRunResult};
use crate::workflow::services::{WorkflowEngine, WorkflowError};
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while assembling a [`Platform`].
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// The job queue snapshot could not be loaded.
    #[error(transparent)]
    JobQueue(#[from] JobQueueError),

    /// A built-in plugin could not be registered.
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl Classify for PlatformError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::JobQueue(err) => err.kind(),
            Self::Plugin(err) => err.kind(),
        }
    }
}

/// Read-only view of everything registered on a platform.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformSnapshot {
    /// Plugin manifests, sorted by name.
    pub plugins: Vec<PluginManifest>,
    /// Agent specs, sorted by name.
    pub agents: Vec<AgentSpec>,
    /// Workflow definitions, sorted by name.
    pub workflows: Vec<WorkflowDefinition>,
    /// Declared extension points, sorted by name.
    pub extension_points: Vec<ExtensionPoint>,
    /// Topics with subscribers or history.
    pub topics: Vec<String>,
    /// Job types with a registered handler.
    pub job_handlers: Vec<String>,
}

/// Builder for [`Platform`].
pub struct PlatformBuilder<C = DefaultClock> {
    config: OrchestratorConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    audit: Option<Arc<dyn AuditLogger>>,
    legacy_executor: Option<Arc<dyn LegacyExecutor>>,
    discover: bool,
    clock: Arc<C>,
}

impl PlatformBuilder<DefaultClock> {
    fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            store: None,
            audit: None,
            legacy_executor: None,
            discover: true,
            clock: Arc::new(DefaultClock),
        }
    }
}

impl<C> PlatformBuilder<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Persists the job queue in `store` instead of memory.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sends audit records to `audit` instead of `tracing`.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Runs legacy plugins through `executor` instead of the sandbox.
    #[must_use]
    pub fn with_legacy_executor(mut self, executor: Arc<dyn LegacyExecutor>) -> Self {
        self.legacy_executor = Some(executor);
        self
    }

    /// Skips loading manifests from the plugins root.
    #[must_use]
    pub const fn without_discovery(mut self) -> Self {
        self.discover = false;
        self
    }

    /// Uses `clock` for job timestamps and event envelopes.
    #[must_use]
    pub fn with_clock<T>(self, clock: Arc<T>) -> PlatformBuilder<T>
    where
        T: Clock + Send + Sync + 'static,
    {
        PlatformBuilder {
            config: self.config,
            store: self.store,
            audit: self.audit,
            legacy_executor: self.legacy_executor,
            discover: self.discover,
            clock,
        }
    }

    /// Wires the components.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::JobQueue`] when the queue snapshot cannot be
    /// loaded and [`PlatformError::Plugin`] when the built-in plugin cannot
    /// be registered.
    pub async fn build(self) -> Result<Platform<C>, PlatformError> {
        let config = self.config;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryKeyValueStore::new()));
        let audit = self
            .audit
            .unwrap_or_else(|| Arc::new(TracingAuditLogger));
        let bus_clock: Arc<dyn Clock + Send + Sync> = self.clock.clone();
        let bus = Arc::new(EventBus::with_clock(config.event_bus, bus_clock));
        let jobs = Arc::new(
            JobQueue::open(store, Arc::clone(&audit), self.clock, config.job_queue).await?,
        );

        let framework = PluginFramework::new(Arc::clone(&bus), audit, config.plugin_framework());
        let executor = self.legacy_executor.unwrap_or_else(|| {
            Arc::new(PluginSandbox::with_shared_allowlist(
                config.sandbox.clone(),
                framework.legacy_allowlist().clone(),
            ))
        });
        let plugins = Arc::new(framework.with_legacy_executor(executor));
        plugins.register_sdk_plugin(Arc::new(HealthProbePlugin::new()))?;
        if self.discover {
            let loaded = plugins.discover_manifests();
            tracing::debug!(plugins_root = %config.plugins_root, loaded, "platform plugin discovery finished");
        }

        let agents = Arc::new(AgentFramework::new(Arc::clone(&bus)));
        let workflows = Arc::new(WorkflowEngine::new(
            Arc::clone(&bus),
            Arc::clone(&agents),
            Arc::clone(&plugins),
        ));

        Ok(Platform {
            config,
            bus,
            jobs,
            plugins,
            agents,
            workflows,
        })
    }
}

/// Every orchestration service, wired together.
pub struct Platform<C = DefaultClock>
where
    C: Clock + Send + Sync + 'static,
{
    config: OrchestratorConfig,
    bus: Arc<EventBus>,
    jobs: Arc<JobQueue<dyn KeyValueStore, C>>,
    plugins: Arc<PluginFramework>,
    agents: Arc<AgentFramework>,
    workflows: Arc<WorkflowEngine>,
}

impl Platform<DefaultClock> {
    /// Starts building a platform from `config`.
    #[must_use]
    pub fn builder(config: OrchestratorConfig) -> PlatformBuilder<DefaultClock> {
        PlatformBuilder::new(config)
    }
}

impl<C> Platform<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Returns the settings the platform was built with.
    #[must_use]
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Returns the event bus.
    #[must_use]
    pub const fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Returns the job queue.
    #[must_use]
    pub const fn jobs(&self) -> &Arc<JobQueue<dyn KeyValueStore, C>> {
        &self.jobs
    }

    /// Returns the plugin framework.
    #[must_use]
    pub const fn plugins(&self) -> &Arc<PluginFramework> {
        &self.plugins
    }

    /// Returns the agent framework.
    #[must_use]
    pub const fn agents(&self) -> &Arc<AgentFramework> {
        &self.agents
    }

    /// Returns the workflow engine.
    #[must_use]
    pub const fn workflows(&self) -> &Arc<WorkflowEngine> {
        &self.workflows
    }

    /// Starts the job worker.
    pub fn start(&self) {
        self.jobs.start();
    }

    /// Stops the job worker and waits for it to exit.
    pub async fn stop(&self) {
        self.jobs.stop().await;
    }

    /// Registers the handler for `job_type`.
    pub fn register_job_handler(&self, job_type: impl Into<String>, handler: Arc<dyn JobHandler>) {
        self.jobs.register_handler(job_type, handler);
    }

    /// Queues a job.
    ///
    /// # Errors
    ///
    /// Returns [`JobQueueError`] when the job cannot be persisted.
    pub async fn enqueue_job(
        &self,
        job_type: &str,
        payload: Payload,
        max_retries: u32,
    ) -> Result<JobView, JobQueueError> {
        self.jobs.enqueue(job_type, payload, max_retries).await
    }

    /// Returns the job with `id`.
    pub async fn get_job(&self, id: JobId) -> Option<JobView> {
        self.jobs.get_job(id).await
    }

    /// Returns every job, oldest first.
    pub async fn list_jobs(&self) -> Vec<JobView> {
        self.jobs.list_jobs().await
    }

    /// Runs plugin `name`.
    ///
    /// # Errors
    ///
    /// See [`PluginFramework::run_plugin`].
    pub async fn run_plugin(
        &self,
        name: &str,
        args: &[String],
        context: &ExecutionContext,
        required_permission: &str,
    ) -> Result<Payload, PluginError> {
        self.plugins
            .run_plugin(name, args, context, required_permission)
            .await
    }

    /// Returns every plugin manifest.
    #[must_use]
    pub fn list_plugins(&self) -> Vec<PluginManifest> {
        self.plugins.list_plugins()
    }

    /// Returns the manifest registered under `name`.
    #[must_use]
    pub fn get_plugin_manifest(&self, name: &str) -> Option<PluginManifest> {
        self.plugins.get_plugin_manifest(name)
    }

    /// Registers an agent.
    ///
    /// # Errors
    ///
    /// See [`AgentFramework::register_agent`].
    pub fn register_agent(
        &self,
        spec: AgentSpec,
        handler: Arc<dyn AgentHandler>,
    ) -> Result<(), AgentError> {
        self.agents.register_agent(spec, handler)
    }

    /// Runs agent `name`.
    ///
    /// # Errors
    ///
    /// See [`AgentFramework::run_agent`].
    pub async fn run_agent(
        &self,
        name: &str,
        payload: Payload,
        context: &ExecutionContext,
    ) -> Result<AgentRunResult, AgentError> {
        self.agents.run_agent(name, payload, context).await
    }

    /// Returns every agent spec.
    #[must_use]
    pub fn list_agents(&self) -> Vec<AgentSpec> {
        self.agents.list_agents()
    }

    /// Registers a workflow.
    ///
    /// # Errors
    ///
    /// See [`WorkflowEngine::register_workflow`].
    pub fn register_workflow(&self, definition: WorkflowDefinition) -> Result<(), WorkflowError> {
        self.workflows.register_workflow(definition)
    }

    /// Runs workflow `name`.
    ///
    /// # Errors
    ///
    /// See [`WorkflowEngine::run_workflow`].
    pub async fn run_workflow(
        &self,
        name: &str,
        payload: &Payload,
        context: &ExecutionContext,
    ) -> Result<WorkflowRunResult, WorkflowError> {
        self.workflows.run_workflow(name, payload, context).await
    }

    /// Returns every workflow definition.
    #[must_use]
    pub fn list_workflows(&self) -> Vec<WorkflowDefinition> {
        self.workflows.list_workflows()
    }

    /// Returns every declared extension point.
    #[must_use]
    pub fn list_extension_points(&self) -> Vec<ExtensionPoint> {
        self.plugins.list_extension_points()
    }

    /// Returns every known event topic.
    #[must_use]
    pub fn list_topics(&self) -> Vec<String> {
        self.bus.list_topics()
    }

    /// Returns up to `limit` of the most recent events, oldest first.
    #[must_use]
    pub fn recent_events(&self, limit: usize) -> Vec<EventEnvelope> {
        self.bus.recent_events(limit)
    }

    /// Collects the registries into one introspection bundle.
    #[must_use]
    pub fn snapshot(&self) -> PlatformSnapshot {
        PlatformSnapshot {
            plugins: self.list_plugins(),
            agents: self.list_agents(),
            workflows: self.list_workflows(),
            extension_points: self.list_extension_points(),
            topics: self.list_topics(),
            job_handlers: self.jobs.handler_types(),
        }
    }
}

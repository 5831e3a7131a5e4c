//! Shared world state for plugin permission BDD scenarios.

use std::sync::Arc;

use gitvibe_orchestrator::audit::adapters::InMemoryAuditLog;
use gitvibe_orchestrator::config::OrchestratorConfig;
use gitvibe_orchestrator::context::{ExecutionContext, Payload};
use gitvibe_orchestrator::platform::Platform;
use gitvibe_orchestrator::plugin::services::PluginError;
use rstest::fixture;

/// Scenario world for plugin permission behaviour tests.
pub struct PluginWorld {
    /// Platform under test, built by a `Given` step.
    pub platform: Option<Platform>,
    /// Audit records written by the platform.
    pub audit: Arc<InMemoryAuditLog>,
    /// Result of the last plugin run.
    pub last_result: Option<Result<Payload, PluginError>>,
}

impl PluginWorld {
    /// Creates a world with no platform yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: None,
            audit: Arc::new(InMemoryAuditLog::new()),
            last_result: None,
        }
    }

    /// Returns the platform built by a `Given` step.
    ///
    /// # Errors
    ///
    /// Returns an error when no platform has been built.
    pub fn platform(&self) -> Result<&Platform, eyre::Report> {
        self.platform
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no platform in scenario world"))
    }
}

impl Default for PluginWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PluginWorld {
    PluginWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a platform writing audit records to `audit`.
///
/// # Errors
///
/// Returns an error when the platform cannot be assembled.
pub fn build_platform(audit: Arc<InMemoryAuditLog>) -> Result<Platform, eyre::Report> {
    run_async(
        Platform::builder(OrchestratorConfig::default())
            .with_audit(audit)
            .without_discovery()
            .build(),
    )
    .map_err(|err| eyre::eyre!("platform build failed: {err}"))
}

/// Context used for every scenario request.
#[must_use]
pub fn scenario_context() -> ExecutionContext {
    ExecutionContext::new("scenario-user", "maintainer").with_request_id("bdd-1")
}

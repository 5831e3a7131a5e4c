//! Shared test helpers for in-memory platform integration tests.

use std::sync::Arc;
use std::time::Duration;

use gitvibe_orchestrator::audit::adapters::InMemoryAuditLog;
use gitvibe_orchestrator::config::OrchestratorConfig;
use gitvibe_orchestrator::context::{ExecutionContext, Payload, into_payload};
use gitvibe_orchestrator::job_queue::domain::{JobId, JobView};
use gitvibe_orchestrator::platform::Platform;
use serde_json::Value;

/// A platform together with the audit log it writes to.
pub struct TestPlatform {
    /// The platform under test.
    pub platform: Platform,
    /// Audit records written by the platform.
    pub audit: Arc<InMemoryAuditLog>,
}

/// Builds a platform with in-memory storage and no manifest discovery.
///
/// # Panics
///
/// Panics if the platform cannot be built.
pub async fn test_platform(config: OrchestratorConfig) -> TestPlatform {
    let audit = Arc::new(InMemoryAuditLog::new());
    let platform = Platform::builder(config)
        .with_audit(audit.clone())
        .without_discovery()
        .build()
        .await
        .expect("in-memory platform should build");
    TestPlatform { platform, audit }
}

/// Returns the context used by every test request.
#[must_use]
pub fn context() -> ExecutionContext {
    ExecutionContext::new("octocat", "admin").with_request_id("req-int")
}

/// Converts a JSON object literal into a payload.
#[must_use]
pub fn payload(value: Value) -> Payload {
    into_payload(value)
}

/// Converts string literals into owned arguments.
#[must_use]
pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

/// Polls until job `id` reaches a terminal state or two seconds pass.
pub async fn wait_for_terminal(platform: &Platform, id: JobId) -> Option<JobView> {
    for _ in 0..40 {
        if let Some(job) = platform.get_job(id).await
            && job.status.is_terminal()
        {
            return Some(job);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    platform
        .get_job(id)
        .await
        .filter(|job| job.status.is_terminal())
}

//! Shared world state for job queue BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use gitvibe_orchestrator::audit::adapters::InMemoryAuditLog;
use gitvibe_orchestrator::config::OrchestratorConfig;
use gitvibe_orchestrator::job_queue::domain::{JobId, JobView};
use gitvibe_orchestrator::platform::Platform;
use mockable::Clock;
use parking_lot::Mutex;
use rstest::fixture;

/// Clock advanced explicitly by scenario steps.
#[derive(Debug)]
pub struct StepClock {
    now: Mutex<DateTime<Utc>>,
}

impl StepClock {
    /// Creates a clock fixed at 2024-06-01T09:00:00Z.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.now.lock();
        *now += chrono::Duration::seconds(seconds);
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.now.lock().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Platform type driven by the step clock.
pub type ScenarioPlatform = Platform<StepClock>;

/// Scenario world for job queue behaviour tests.
pub struct QueueWorld {
    /// Platform under test, built by a `Given` step.
    pub platform: Option<ScenarioPlatform>,
    /// Clock shared with the platform.
    pub clock: Arc<StepClock>,
    /// Identifier of the job under observation.
    pub job_id: Option<JobId>,
    /// Job returned by the last processing pass, if any.
    pub last_processed: Option<JobView>,
}

impl QueueWorld {
    /// Creates a world with no platform yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: None,
            clock: Arc::new(StepClock::new()),
            job_id: None,
            last_processed: None,
        }
    }

    /// Returns the platform built by a `Given` step.
    ///
    /// # Errors
    ///
    /// Returns an error when no platform has been built.
    pub fn platform(&self) -> Result<&ScenarioPlatform, eyre::Report> {
        self.platform
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no platform in scenario world"))
    }

    /// Returns the current state of the observed job.
    ///
    /// # Errors
    ///
    /// Returns an error when no job was queued or it cannot be found.
    pub fn job(&self) -> Result<JobView, eyre::Report> {
        let id = self
            .job_id
            .ok_or_else(|| eyre::eyre!("no job queued in scenario world"))?;
        run_async(self.platform()?.get_job(id))
            .ok_or_else(|| eyre::eyre!("job {id} not found"))
    }
}

impl Default for QueueWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> QueueWorld {
    QueueWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds an in-memory platform on the world clock.
///
/// # Errors
///
/// Returns an error when the platform cannot be assembled.
pub fn build_platform(clock: Arc<StepClock>) -> Result<ScenarioPlatform, eyre::Report> {
    run_async(
        Platform::builder(OrchestratorConfig::default())
            .with_audit(Arc::new(InMemoryAuditLog::new()))
            .without_discovery()
            .with_clock(clock)
            .build(),
    )
    .map_err(|err| eyre::eyre!("platform build failed: {err}"))
}

//! Job aggregate and its public projection.

use super::{JobId, JobStatus};
use crate::context::Payload;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A unit of background work and its delivery bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    #[serde(rename = "type")]
    job_type: String,
    #[serde(default)]
    payload: Payload,
    status: JobStatus,
    #[serde(default)]
    attempts: u32,
    #[serde(default)]
    max_retries: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    last_error: Option<String>,
    #[serde(default)]
    result: Option<Payload>,
    run_after: DateTime<Utc>,
}

/// What happened to a job after its handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// The job was put back in line and becomes eligible after `delay`.
    Retry {
        /// Failed attempts so far.
        attempts: u32,
        /// Backoff before the next attempt.
        delay: Duration,
    },
    /// The retry budget is spent and the job is terminal.
    Failed {
        /// Failed attempts so far.
        attempts: u32,
    },
}

impl Job {
    /// Creates a queued job that is immediately eligible.
    #[must_use]
    pub fn new(
        job_type: impl Into<String>,
        payload: Payload,
        max_retries: u32,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.utc();
        Self {
            id: JobId::new(),
            job_type: job_type.into(),
            payload,
            status: JobStatus::Queued,
            attempts: 0,
            max_retries,
            created_at: now,
            updated_at: now,
            last_error: None,
            result: None,
            run_after: now,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the handler tag.
    #[must_use]
    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    /// Returns the handler input.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the number of failed attempts.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the earliest time the job may be dispatched.
    #[must_use]
    pub const fn run_after(&self) -> DateTime<Utc> {
        self.run_after
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when the job is queued and its backoff has elapsed.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Queued && self.run_after <= now
    }

    /// Claims the job for the worker.
    pub fn start(&mut self, clock: &impl Clock) {
        self.status = JobStatus::Running;
        self.updated_at = clock.utc();
    }

    /// Records a successful handler result.
    pub fn complete(&mut self, result: Payload, clock: &impl Clock) {
        self.status = JobStatus::Completed;
        self.result = Some(result);
        self.last_error = None;
        self.updated_at = clock.utc();
    }

    /// Records a handler failure and applies linear backoff.
    ///
    /// The job is re-queued with `run_after = now + retry_base × attempts`
    /// while `attempts <= max_retries`, otherwise it becomes `Failed`.
    pub fn fail(
        &mut self,
        error: impl Into<String>,
        retry_base: Duration,
        clock: &impl Clock,
    ) -> FailureOutcome {
        let now = clock.utc();
        self.attempts = self.attempts.saturating_add(1);
        self.last_error = Some(error.into());
        self.updated_at = now;

        if self.attempts > self.max_retries {
            self.status = JobStatus::Failed;
            return FailureOutcome::Failed {
                attempts: self.attempts,
            };
        }

        let delay = retry_base.saturating_mul(self.attempts);
        let step = TimeDelta::from_std(delay).unwrap_or(TimeDelta::MAX);
        self.status = JobStatus::Queued;
        self.run_after = now.checked_add_signed(step).unwrap_or(DateTime::<Utc>::MAX_UTC);
        FailureOutcome::Retry {
            attempts: self.attempts,
            delay,
        }
    }

    /// Puts a job interrupted mid-run back in line. Returns `true` when the
    /// status changed.
    pub fn recover(&mut self) -> bool {
        if self.status != JobStatus::Running {
            return false;
        }
        self.status = JobStatus::Queued;
        true
    }

    /// Returns the public projection of this job.
    #[must_use]
    pub fn view(&self) -> JobView {
        JobView {
            id: self.id,
            job_type: self.job_type.clone(),
            payload: self.payload.clone(),
            status: self.status,
            attempts: self.attempts,
            max_retries: self.max_retries,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_error: self.last_error.clone(),
            result: self.result.clone(),
        }
    }
}

/// Host-facing projection of a job: every field except `run_after`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobView {
    /// Job identifier.
    pub id: JobId,
    /// Handler tag.
    #[serde(rename = "type")]
    pub job_type: String,
    /// Handler input.
    pub payload: Payload,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Failed attempts so far.
    pub attempts: u32,
    /// Retry budget.
    pub max_retries: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last transition timestamp.
    pub updated_at: DateTime<Utc>,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
    /// Handler result once completed.
    pub result: Option<Payload>,
}

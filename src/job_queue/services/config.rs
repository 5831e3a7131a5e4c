//! Job queue timing settings.

use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(200);
const DEFAULT_RETRY_BASE: Duration = Duration::from_secs(2);
const MIN_RETRY_BASE: Duration = Duration::from_secs(1);

/// Worker polling and retry backoff settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobQueueConfig {
    poll_interval: Duration,
    retry_base: Duration,
}

impl JobQueueConfig {
    /// Creates a config, raising each value to its floor (200 ms poll
    /// interval, 1 s retry base).
    #[must_use]
    pub fn new(poll_interval: Duration, retry_base: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            retry_base: retry_base.max(MIN_RETRY_BASE),
        }
    }

    /// Returns how long an idle worker sleeps between passes.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the linear backoff unit.
    #[must_use]
    pub const fn retry_base(&self) -> Duration {
        self.retry_base
    }
}

impl Default for JobQueueConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_RETRY_BASE)
    }
}

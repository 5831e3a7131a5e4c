//! Queue orchestration: persistence, dispatch and the background worker.

mod config;
mod queue;
mod worker;

pub use config::JobQueueConfig;
pub use queue::{CORRUPT_STATE_KEY, JobQueue, JobQueueError, JobQueueResult, STATE_KEY};

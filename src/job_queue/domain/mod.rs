//! Domain model for queued jobs and the persisted queue snapshot.

mod error;
mod ids;
mod job;
mod snapshot;
mod status;

pub use error::ParseJobStatusError;
pub use ids::JobId;
pub use job::{FailureOutcome, Job, JobView};
pub use snapshot::{QueueSnapshot, RestoredSnapshot};
pub use status::JobStatus;

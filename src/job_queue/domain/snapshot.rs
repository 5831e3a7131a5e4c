//! In-memory queue state and its persisted form.
//!
//! Persisted layout: `{"jobs": {"<id>": Job}, "queue": ["<id>"], "updated_at": ts}`.

use super::{Job, JobId, JobStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};

/// Every known job plus the FIFO dispatch list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueSnapshot {
    jobs: HashMap<JobId, Job>,
    queue: VecDeque<JobId>,
}

/// Outcome of decoding a persisted snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoredSnapshot {
    /// The repaired state.
    pub snapshot: QueueSnapshot,
    /// The repaired state differs from what was stored and must be rewritten.
    pub dirty: bool,
    /// The stored blob was not a snapshot at all.
    pub corrupt: bool,
    /// Number of job entries that could not be decoded.
    pub dropped_jobs: usize,
}

#[derive(Serialize)]
struct PersistedState<'a> {
    jobs: &'a HashMap<JobId, Job>,
    queue: &'a VecDeque<JobId>,
    updated_at: DateTime<Utc>,
}

impl QueueSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job and appends it to the dispatch list.
    pub fn push(&mut self, job: Job) {
        let id = job.id();
        self.jobs.insert(id, job);
        self.queue.push_back(id);
    }

    /// Appends an already-known job to the dispatch list.
    pub fn requeue(&mut self, id: JobId) {
        self.queue.push_back(id);
    }

    /// Removes a job and every dispatch entry for it.
    pub fn discard(&mut self, id: JobId) -> Option<Job> {
        self.queue.retain(|queued| *queued != id);
        self.jobs.remove(&id)
    }

    /// Returns a claimed job to the head of the dispatch list.
    pub fn release(&mut self, id: JobId) {
        if let Some(job) = self.jobs.get_mut(&id)
            && job.recover()
        {
            self.queue.push_front(id);
        }
    }

    /// Returns the job with `id`.
    #[must_use]
    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Returns the job with `id` for mutation.
    pub fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.get_mut(&id)
    }

    /// Returns the number of entries in the dispatch list.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns every job, oldest first.
    #[must_use]
    pub fn jobs_oldest_first(&self) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self.jobs.values().collect();
        jobs.sort_by_key(|job| (job.created_at(), job.id()));
        jobs
    }

    /// Claims the first eligible job in one pass over the dispatch list.
    ///
    /// Entries whose job is missing or no longer queued are discarded;
    /// entries still backing off rotate to the back. The claimed job is
    /// marked running and removed from the list.
    pub fn claim_next(&mut self, clock: &impl Clock) -> Option<JobId> {
        let now = clock.utc();
        for _ in 0..self.queue.len() {
            let id = self.queue.pop_front()?;
            let Some(job) = self.jobs.get_mut(&id) else {
                continue;
            };
            if job.status() != JobStatus::Queued {
                continue;
            }
            if !job.is_due(now) {
                self.queue.push_back(id);
                continue;
            }
            job.start(clock);
            return Some(id);
        }
        None
    }

    /// Encodes the snapshot in its persisted layout.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when a job cannot be encoded.
    pub fn to_value(&self, updated_at: DateTime<Utc>) -> Result<Value, serde_json::Error> {
        serde_json::to_value(PersistedState {
            jobs: &self.jobs,
            queue: &self.queue,
            updated_at,
        })
    }

    /// Decodes and repairs a persisted snapshot.
    ///
    /// Undecodable jobs and non-identifier queue entries are dropped,
    /// duplicate queue entries removed, running jobs reset to queued, and
    /// queued jobs missing from the list appended in creation order.
    #[must_use]
    pub fn restore(raw: &Value) -> RestoredSnapshot {
        let Some(object) = raw.as_object() else {
            return RestoredSnapshot {
                snapshot: Self::default(),
                dirty: true,
                corrupt: true,
                dropped_jobs: 0,
            };
        };

        let mut dirty = false;
        let mut dropped_jobs = 0_usize;
        let mut jobs = HashMap::new();
        match object.get("jobs") {
            Some(Value::Object(entries)) => {
                for (key, entry) in entries {
                    match serde_json::from_value::<Job>(entry.clone()) {
                        Ok(job) => {
                            jobs.insert(job.id(), job);
                        }
                        Err(err) => {
                            tracing::warn!(job_key = %key, error = %err, "dropping undecodable persisted job");
                            dropped_jobs = dropped_jobs.saturating_add(1);
                            dirty = true;
                        }
                    }
                }
            }
            Some(_) => dirty = true,
            None => {}
        }

        let mut queue = VecDeque::new();
        let mut seen = HashSet::new();
        match object.get("queue") {
            Some(Value::Array(items)) => {
                for item in items {
                    match item.as_str().and_then(|s| s.parse::<JobId>().ok()) {
                        Some(id) if seen.insert(id) => queue.push_back(id),
                        _ => dirty = true,
                    }
                }
            }
            Some(_) => dirty = true,
            None => {}
        }

        let mut snapshot = Self { jobs, queue };
        let mut recovered: Vec<(DateTime<Utc>, JobId)> = Vec::new();
        for job in snapshot.jobs.values_mut() {
            if job.recover() {
                dirty = true;
            }
            if job.status() == JobStatus::Queued && !seen.contains(&job.id()) {
                recovered.push((job.created_at(), job.id()));
            }
        }
        recovered.sort();
        for (_, id) in recovered {
            snapshot.queue.push_back(id);
            dirty = true;
        }

        RestoredSnapshot {
            snapshot,
            dirty,
            corrupt: false,
            dropped_jobs,
        }
    }
}

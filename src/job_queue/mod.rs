//! Durable, retrying background job queue.
//!
//! Jobs are persisted as one snapshot in a [`KeyValueStore`] after every
//! transition, dispatched FIFO by a single worker, and retried with linear
//! backoff until their retry budget is spent. Jobs found `running` when the
//! queue is opened are put back in line, so delivery is at-least-once.
//!
//! - Domain types in [`domain`]
//! - Handler contract in [`ports`]
//! - Queue and worker in [`services`]
//!
//! [`KeyValueStore`]: crate::storage::ports::KeyValueStore

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

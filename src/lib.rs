//! GitVibe orchestrator: asynchronous orchestration core.
//!
//! This crate runs background jobs, routes events between components and
//! executes plugins, agents and workflows on behalf of a git-review host.
//!
//! # Architecture
//!
//! The orchestrator follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and validation with no infrastructure dependencies
//! - **Ports**: Async trait interfaces at the seams (stores, audit sinks,
//!   handlers, executors)
//! - **Adapters**: Concrete implementations of ports (in-memory, JSON files,
//!   `tracing`, the process sandbox)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`job_queue`]: Durable FIFO job queue with linear-backoff retries
//! - [`event_bus`]: In-process publish/subscribe with bounded history
//! - [`plugin`]: Permissioned plugin registry, extension points and runner
//! - [`sandbox`]: Best-effort process isolation for legacy plugins
//! - [`agent`]: Named, versioned request/response agents
//! - [`workflow`]: Sequential pipelines over events, agents and plugins
//! - [`platform`]: Composition root wiring everything together
//! - [`config`]: Environment-driven settings

pub mod agent;
pub mod audit;
pub mod config;
pub mod context;
pub mod error;
pub mod event_bus;
pub mod job_queue;
pub mod platform;
pub mod plugin;
pub mod sandbox;
pub mod storage;
pub mod workflow;

#[cfg(test)]
mod test_support;

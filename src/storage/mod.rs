//! Key-value persistence port and adapters.
//!
//! The job queue stores its snapshot through [`ports::KeyValueStore`]; hosts
//! supply the production store (for example an encrypted vault) and tests use
//! [`adapters::memory::InMemoryKeyValueStore`].

pub mod adapters;
pub mod ports;

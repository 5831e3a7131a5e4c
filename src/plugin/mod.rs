//! Permissioned plugin framework.
//!
//! Plugins are described by a [`domain::PluginManifest`] and executed either
//! in-process through an SDK handler or out-of-process through a legacy
//! executor (normally the [`crate::sandbox`]). Every execution is gated on a
//! manifest permission, announced on the event bus, offered to extension
//! hooks and audited, whether it succeeds or is blocked.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Built-in plugins in [`adapters`]
//! - Registry and framework services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

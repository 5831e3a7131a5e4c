//! Best-effort OS-process isolation for legacy plugins.
//!
//! [`PluginSandbox`] implements the plugin framework's
//! [`LegacyExecutor`](crate::plugin::ports::LegacyExecutor) port. It is deny
//! by default: the sandbox must be enabled, the plugin allowlisted and its
//! executable located strictly inside the plugins root. Accepted plugins run
//! in a throwaway working directory with a scrubbed environment, resource
//! limits and a wall-clock timeout. This is not a security boundary.

mod config;
mod error;
mod executor;

pub use config::{ResourceLimits, SandboxConfig};
pub use error::SandboxError;
pub use executor::PluginSandbox;

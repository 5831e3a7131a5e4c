//! Sandbox rejection and failure reasons.

use crate::error::{Classify, ErrorKind};
use crate::plugin::ports::PluginExecutionError;
use std::sync::Arc;
use thiserror::Error;

/// Reasons a sandboxed plugin run was refused or failed.
#[derive(Debug, Clone, Error)]
pub enum SandboxError {
    /// The sandbox is switched off.
    #[error("Plugin sandbox is disabled by default.")]
    Disabled,

    /// The plugin is not on the allowlist.
    #[error("Plugin is not in the allowlist.")]
    NotAllowlisted,

    /// The plugin name contains characters outside `[a-zA-Z0-9._-]`.
    #[error("Invalid plugin name.")]
    InvalidName,

    /// The resolved executable lies outside the plugins root.
    #[error("Plugin path escapes sandbox root.")]
    PathEscape,

    /// The executable does not exist or is not a regular file.
    #[error("Plugin binary not found.")]
    NotFound,

    /// The executable bit is not set.
    #[error("Plugin is not executable.")]
    NotExecutable,

    /// An argument contains a line break.
    #[error("Invalid plugin arguments.")]
    InvalidArguments,

    /// The process exceeded the wall-clock timeout and was killed.
    #[error("Plugin execution timed out.")]
    TimedOut,

    /// The process could not be started or observed.
    #[error("failed to run plugin: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for SandboxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl Classify for SandboxError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Forbidden
    }
}

impl From<SandboxError> for PluginExecutionError {
    fn from(err: SandboxError) -> Self {
        Self::new(err.to_string())
    }
}

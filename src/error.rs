//! Cross-module error classification.
//!
//! Every module exposes its own `thiserror` enum. Hosts that need to map
//! failures onto a transport (HTTP status codes, exit codes) classify them
//! through [`ErrorKind`] rather than matching on each enum.

use std::fmt;

/// Coarse classification shared by every module error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An unknown job, agent, plugin, workflow or extension point.
    NotFound,
    /// A missing permission or a failed plugin execution.
    Forbidden,
    /// Invalid registration input or step configuration.
    Configuration,
    /// A required collaborator is not configured.
    Unavailable,
    /// An agent handler failed.
    Execution,
    /// The backing store failed.
    Persistence,
}

impl ErrorKind {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Configuration => "configuration",
            Self::Unavailable => "unavailable",
            Self::Execution => "execution",
            Self::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every module error so callers can classify failures.
pub trait Classify {
    /// Returns the coarse kind of this error.
    fn kind(&self) -> ErrorKind;
}

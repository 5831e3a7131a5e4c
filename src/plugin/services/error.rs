//! Service-level plugin errors.

use crate::error::{Classify, ErrorKind};
use crate::plugin::{domain::PluginDomainError, ports::PluginExecutionError};
use thiserror::Error;

/// Errors returned by plugin registry and framework operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginError {
    /// No manifest is registered and the name is not allowlisted.
    #[error("Plugin '{0}' is not registered.")]
    NotRegistered(String),

    /// The manifest does not grant the required permission.
    #[error("Plugin '{plugin}' (version {version}) does not grant permission '{permission}'.")]
    PermissionDenied {
        /// Plugin name.
        plugin: String,
        /// Manifest version.
        version: String,
        /// Permission that was required.
        permission: String,
    },

    /// The plugin needs the legacy executor but none is configured.
    #[error("No legacy plugin executor configured.")]
    ExecutorUnavailable,

    /// The plugin or its executor failed.
    #[error("{source}")]
    ExecutionFailed {
        /// Plugin name.
        plugin: String,
        /// Underlying failure.
        source: PluginExecutionError,
    },

    /// The manifest failed validation.
    #[error(transparent)]
    InvalidManifest(#[from] PluginDomainError),

    /// The extension point has not been declared.
    #[error("Unknown extension point: {0}")]
    UnknownExtensionPoint(String),
}

impl Classify for PluginError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotRegistered(_) | Self::UnknownExtensionPoint(_) => ErrorKind::NotFound,
            Self::PermissionDenied { .. } | Self::ExecutionFailed { .. } => ErrorKind::Forbidden,
            Self::ExecutorUnavailable => ErrorKind::Unavailable,
            Self::InvalidManifest(_) => ErrorKind::Configuration,
        }
    }
}

/// Result type for plugin service operations.
pub type PluginResult<T> = Result<T, PluginError>;

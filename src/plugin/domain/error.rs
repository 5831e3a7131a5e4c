//! Error types for plugin manifest validation.

use thiserror::Error;

/// Errors returned while validating plugin manifests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginDomainError {
    /// The plugin name is empty after trimming.
    #[error("Plugin name cannot be empty.")]
    EmptyName,

    /// The version is not `MAJOR.MINOR.PATCH` with an optional suffix.
    #[error("Plugin '{name}' version must be semver-like.")]
    InvalidVersion {
        /// Plugin name.
        name: String,
        /// Rejected version string.
        version: String,
    },
}

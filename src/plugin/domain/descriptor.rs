//! Descriptor exposed by in-process SDK plugins.

use super::permissions;
use std::collections::BTreeSet;

/// Fixed self-description of an SDK plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    name: String,
    version: String,
    permissions: BTreeSet<String>,
    extension_points: BTreeSet<String>,
    description: String,
}

impl PluginDescriptor {
    /// Creates a descriptor granting only `plugin:execute`.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            permissions: BTreeSet::from([permissions::EXECUTE.to_owned()]),
            extension_points: BTreeSet::new(),
            description: String::new(),
        }
    }

    /// Replaces the granted permissions.
    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the declared extension points.
    #[must_use]
    pub fn with_extension_points<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extension_points = points.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the plugin name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the granted permissions.
    #[must_use]
    pub const fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns the declared extension points.
    #[must_use]
    pub const fn extension_points(&self) -> &BTreeSet<String> {
        &self.extension_points
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

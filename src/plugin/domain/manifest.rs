//! Plugin manifest and validation.

use super::{PluginDescriptor, PluginDomainError, PluginRuntime, permissions};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Version assigned to auto-registered legacy plugins.
pub const LEGACY_VERSION: &str = "0.1.0-legacy";

const SDK_GIT_PROVIDERS: [&str; 4] = ["github", "gitlab", "gitea", "bitbucket"];

#[expect(
    clippy::expect_used,
    reason = "the pattern is a compile-time constant"
)]
static SEMVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+([-+][0-9A-Za-z.-]+)?$").expect("constant regex pattern is valid")
});

/// Declarative description of a plugin and what it is allowed to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    name: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    runtime: PluginRuntime,
    #[serde(default)]
    description: String,
    #[serde(default = "default_permissions")]
    permissions: BTreeSet<String>,
    #[serde(default)]
    extension_points: BTreeSet<String>,
    #[serde(default = "default_git_providers")]
    git_providers: BTreeSet<String>,
    #[serde(default)]
    entrypoint: Option<String>,
}

fn default_version() -> String {
    "0.1.0".to_owned()
}

fn default_permissions() -> BTreeSet<String> {
    BTreeSet::from([permissions::EXECUTE.to_owned()])
}

fn default_git_providers() -> BTreeSet<String> {
    BTreeSet::from(["github".to_owned()])
}

impl PluginManifest {
    /// Creates a `process` manifest with default permissions and providers.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            runtime: PluginRuntime::default(),
            description: String::new(),
            permissions: default_permissions(),
            extension_points: BTreeSet::new(),
            git_providers: default_git_providers(),
            entrypoint: None,
        }
    }

    /// Derives the manifest of an in-process SDK plugin.
    #[must_use]
    pub fn for_sdk(descriptor: &PluginDescriptor) -> Self {
        Self {
            name: descriptor.name().to_owned(),
            version: descriptor.version().to_owned(),
            runtime: PluginRuntime::Sdk,
            description: descriptor.description().to_owned(),
            permissions: descriptor.permissions().clone(),
            extension_points: descriptor.extension_points().clone(),
            git_providers: SDK_GIT_PROVIDERS.iter().map(|p| (*p).to_owned()).collect(),
            entrypoint: Some(format!("sdk://{}", descriptor.name())),
        }
    }

    /// Synthesizes the manifest of an allowlisted executable under
    /// `plugins_root`.
    #[must_use]
    pub fn for_legacy(name: &str, plugins_root: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: LEGACY_VERSION.to_owned(),
            runtime: PluginRuntime::Legacy,
            description: "Auto-registered legacy plugin.".to_owned(),
            permissions: default_permissions(),
            extension_points: BTreeSet::from([
                super::PLUGIN_PRE_EXECUTE.to_owned(),
                super::PLUGIN_POST_EXECUTE.to_owned(),
            ]),
            git_providers: default_git_providers(),
            entrypoint: Some(format!("{}/{name}", plugins_root.trim_end_matches('/'))),
        }
    }

    /// Sets the runtime.
    #[must_use]
    pub const fn with_runtime(mut self, runtime: PluginRuntime) -> Self {
        self.runtime = runtime;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
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

    /// Replaces the supported git providers.
    #[must_use]
    pub fn with_git_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.git_providers = providers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the entrypoint locator.
    #[must_use]
    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = Some(entrypoint.into());
        self
    }

    /// Checks the name is non-blank and the version is semver-like.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::EmptyName`] or
    /// [`PluginDomainError::InvalidVersion`].
    pub fn validate(&self) -> Result<(), PluginDomainError> {
        if self.name.trim().is_empty() {
            return Err(PluginDomainError::EmptyName);
        }
        if !SEMVER_PATTERN.is_match(&self.version) {
            return Err(PluginDomainError::InvalidVersion {
                name: self.name.clone(),
                version: self.version.clone(),
            });
        }
        Ok(())
    }

    /// Returns the unique plugin name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the runtime.
    #[must_use]
    pub const fn runtime(&self) -> PluginRuntime {
        self.runtime
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the granted permissions.
    #[must_use]
    pub const fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns `true` when `permission` is granted.
    #[must_use]
    pub fn grants(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns the declared extension points.
    #[must_use]
    pub const fn extension_points(&self) -> &BTreeSet<String> {
        &self.extension_points
    }

    /// Returns the supported git providers.
    #[must_use]
    pub const fn git_providers(&self) -> &BTreeSet<String> {
        &self.git_providers
    }

    /// Returns the entrypoint locator.
    #[must_use]
    pub fn entrypoint(&self) -> Option<&str> {
        self.entrypoint.as_deref()
    }
}

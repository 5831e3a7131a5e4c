//! Plugin execution runtimes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a plugin is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginRuntime {
    /// Trusted in-process handler.
    Sdk,
    /// Allowlisted executable run through the legacy executor.
    Legacy,
    /// Manifest discovered on disk without an in-process handler.
    #[default]
    Process,
}

impl PluginRuntime {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sdk => "sdk",
            Self::Legacy => "legacy",
            Self::Process => "process",
        }
    }
}

impl fmt::Display for PluginRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

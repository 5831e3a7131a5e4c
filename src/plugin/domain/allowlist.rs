//! Shared set of legacy plugin names allowed to run.

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Cloneable handle to one allowlist.
///
/// Clones share the same set, so a name allowed through any handle is
/// visible to the plugin framework and the sandbox alike.
#[derive(Debug, Clone, Default)]
pub struct LegacyAllowlist {
    names: Arc<RwLock<BTreeSet<String>>>,
}

impl LegacyAllowlist {
    /// Creates an allowlist holding `names`.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Arc::new(RwLock::new(names.into_iter().map(Into::into).collect())),
        }
    }

    /// Adds `name`.
    pub fn allow(&self, name: impl Into<String>) {
        self.names.write().insert(name.into());
    }

    /// Returns `true` when `name` is allowed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.read().contains(name)
    }

    /// Returns the allowed names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.names.read().iter().cloned().collect()
    }
}

//! Extension point catalog and hook dispatch.

use super::{PluginError, PluginResult};
use crate::context::Payload;
use crate::plugin::domain::{BUILTIN_EXTENSION_POINTS, ExtensionPoint};
use crate::plugin::ports::ExtensionHook;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Declared extension points and the hooks attached to them.
pub struct ExtensionRegistry {
    points: RwLock<BTreeMap<String, String>>,
    hooks: RwLock<HashMap<String, Vec<Arc<dyn ExtensionHook>>>>,
}

impl ExtensionRegistry {
    /// Creates a catalog holding the built-in extension points.
    #[must_use]
    pub fn new() -> Self {
        let points = BUILTIN_EXTENSION_POINTS
            .iter()
            .map(|(name, description)| ((*name).to_owned(), (*description).to_owned()))
            .collect();
        Self {
            points: RwLock::new(points),
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Declares (or re-describes) an extension point.
    pub fn register_extension_point(&self, name: impl Into<String>, description: impl Into<String>) {
        self.points.write().insert(name.into(), description.into());
    }

    /// Returns every declared extension point, sorted by name.
    #[must_use]
    pub fn list_extension_points(&self) -> Vec<ExtensionPoint> {
        self.points
            .read()
            .iter()
            .map(|(name, description)| ExtensionPoint {
                name: name.clone(),
                description: description.clone(),
            })
            .collect()
    }

    /// Attaches `hook` to a declared extension point.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::UnknownExtensionPoint`] when `point` has not
    /// been declared.
    pub fn register_hook(&self, point: &str, hook: Arc<dyn ExtensionHook>) -> PluginResult<()> {
        if !self.points.read().contains_key(point) {
            return Err(PluginError::UnknownExtensionPoint(point.to_owned()));
        }
        self.hooks
            .write()
            .entry(point.to_owned())
            .or_default()
            .push(hook);
        Ok(())
    }

    /// Awaits every hook attached to `point`, in registration order.
    pub async fn emit(&self, point: &str, payload: &Payload) {
        let hooks: Vec<Arc<dyn ExtensionHook>> =
            self.hooks.read().get(point).cloned().unwrap_or_default();
        for hook in hooks {
            hook.call(payload).await;
        }
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Plugin manifest registry and on-disk discovery.

use crate::plugin::domain::{PluginDomainError, PluginManifest};
use crate::plugin::ports::SdkPlugin;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use glob::Pattern;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

const MANIFEST_FILE_PATTERN: &str = "*.plugin.json";
const NESTED_MANIFEST_FILE: &str = "plugin.json";

#[derive(Default)]
struct RegistryState {
    manifests: HashMap<String, PluginManifest>,
    sdk_plugins: HashMap<String, Arc<dyn SdkPlugin>>,
}

/// Name-keyed store of plugin manifests and SDK handlers.
#[derive(Default)]
pub struct PluginRegistry {
    state: RwLock<RegistryState>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores `manifest`.
    ///
    /// With `replace = false` an existing manifest of the same name is kept.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError`] when the manifest is invalid.
    pub fn register_manifest(
        &self,
        manifest: PluginManifest,
        replace: bool,
    ) -> Result<(), PluginDomainError> {
        manifest.validate()?;
        let mut state = self.state.write();
        if replace || !state.manifests.contains_key(manifest.name()) {
            state.manifests.insert(manifest.name().to_owned(), manifest);
        }
        Ok(())
    }

    /// Stores `manifest` unless one with the same name exists, and returns
    /// whichever manifest is registered afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError`] when the manifest is invalid.
    pub fn get_or_insert(&self, manifest: PluginManifest) -> Result<PluginManifest, PluginDomainError> {
        manifest.validate()?;
        let mut state = self.state.write();
        let stored = state
            .manifests
            .entry(manifest.name().to_owned())
            .or_insert(manifest);
        Ok(stored.clone())
    }

    /// Registers an SDK plugin and the manifest derived from its descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError`] when the derived manifest is invalid.
    pub fn register_sdk_plugin(&self, plugin: Arc<dyn SdkPlugin>) -> Result<(), PluginDomainError> {
        let manifest = PluginManifest::for_sdk(plugin.descriptor());
        manifest.validate()?;
        let name = manifest.name().to_owned();
        let mut state = self.state.write();
        state.manifests.insert(name.clone(), manifest);
        state.sdk_plugins.insert(name, plugin);
        Ok(())
    }

    /// Loads `*.plugin.json` and `*/plugin.json` manifests under `root`.
    ///
    /// Unreadable or invalid files are skipped. Returns the number of
    /// manifests registered; a missing root yields zero.
    #[must_use = "the count reports how many manifests were loaded"]
    pub fn discover_manifests(&self, root: &Utf8Path) -> usize {
        let dir = match Dir::open_ambient_dir(root, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) => {
                tracing::debug!(root = %root, error = %err, "plugin root not readable; skipping discovery");
                return 0;
            }
        };

        let candidates = manifest_candidates(&dir);
        let mut loaded = 0_usize;
        for candidate in candidates {
            match load_manifest(&dir, &candidate) {
                Ok(manifest) => match self.register_manifest(manifest, true) {
                    Ok(()) => loaded = loaded.saturating_add(1),
                    Err(err) => {
                        tracing::warn!(file = %candidate, error = %err, "skipping invalid plugin manifest");
                    }
                },
                Err(reason) => {
                    tracing::warn!(file = %candidate, error = %reason, "skipping unreadable plugin manifest");
                }
            }
        }
        tracing::info!(root = %root, loaded, "plugin manifests discovered");
        loaded
    }

    /// Returns the manifest registered under `name`.
    #[must_use]
    pub fn get_manifest(&self, name: &str) -> Option<PluginManifest> {
        self.state.read().manifests.get(name).cloned()
    }

    /// Returns the SDK handler registered under `name`.
    #[must_use]
    pub fn get_sdk_plugin(&self, name: &str) -> Option<Arc<dyn SdkPlugin>> {
        self.state.read().sdk_plugins.get(name).cloned()
    }

    /// Returns every manifest, sorted by name.
    #[must_use]
    pub fn list_manifests(&self) -> Vec<PluginManifest> {
        let mut manifests: Vec<PluginManifest> =
            self.state.read().manifests.values().cloned().collect();
        manifests.sort_by(|left, right| left.name().cmp(right.name()));
        manifests
    }
}

fn manifest_candidates(dir: &Dir) -> Vec<String> {
    let Ok(pattern) = Pattern::new(MANIFEST_FILE_PATTERN) else {
        return Vec::new();
    };
    let Ok(entries) = dir.entries() else {
        return Vec::new();
    };

    let mut top_level = Vec::new();
    let mut nested = Vec::new();
    for entry in entries.flatten() {
        let Ok(name) = entry.file_name() else {
            continue;
        };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_file() && pattern.matches(&name) {
            top_level.push(name);
        } else if file_type.is_dir() {
            let candidate = format!("{name}/{NESTED_MANIFEST_FILE}");
            if dir.is_file(&candidate) {
                nested.push(candidate);
            }
        }
    }
    top_level.sort();
    nested.sort();
    top_level.extend(nested);
    top_level
}

fn load_manifest(dir: &Dir, file: &str) -> Result<PluginManifest, String> {
    let contents = dir.read_to_string(file).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}

//! Domain model for plugin manifests, permissions and extension points.

mod allowlist;
mod descriptor;
mod error;
mod extension;
mod manifest;
mod output;
pub mod permissions;
mod runtime;

pub use allowlist::LegacyAllowlist;
pub use descriptor::PluginDescriptor;
pub use error::PluginDomainError;
pub use extension::{
    BUILTIN_EXTENSION_POINTS, ExtensionPoint, PLUGIN_POST_EXECUTE, PLUGIN_PRE_EXECUTE,
    WORKFLOW_AFTER_STEP, WORKFLOW_BEFORE_STEP,
};
pub use manifest::{LEGACY_VERSION, PluginManifest};
pub use output::LegacyPluginOutput;
pub use runtime::PluginRuntime;

//! Plugin registry, extension catalog and execution framework.

mod error;
mod extensions;
mod framework;
mod registry;

pub use error::{PluginError, PluginResult};
pub use extensions::ExtensionRegistry;
pub use framework::{PLUGIN_EVENT_SOURCE, PluginFramework, PluginFrameworkConfig};
pub use registry::PluginRegistry;

//! Port contracts for plugin execution and extension hooks.

mod hook;
mod legacy;
mod sdk;

pub use hook::{ExtensionHook, FnExtensionHook, hook_fn};
#[cfg(test)]
pub use legacy::MockLegacyExecutor;
pub use legacy::{LegacyExecutor, PluginExecutionError};
pub use sdk::SdkPlugin;

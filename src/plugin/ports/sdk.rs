//! In-process plugin contract.

use super::PluginExecutionError;
use crate::context::{ExecutionContext, Payload};
use crate::plugin::domain::PluginDescriptor;
use async_trait::async_trait;

/// Trusted plugin executed inside the host process.
#[async_trait]
pub trait SdkPlugin: Send + Sync {
    /// Returns the fixed descriptor the manifest is derived from.
    fn descriptor(&self) -> &PluginDescriptor;

    /// Executes the plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginExecutionError`] when the plugin fails; the framework
    /// treats any failure as a blocked execution.
    async fn execute(
        &self,
        context: &ExecutionContext,
        args: &[String],
    ) -> Result<Payload, PluginExecutionError>;
}

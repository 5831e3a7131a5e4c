//! SDK plugin used for runtime observability checks.

use crate::context::{ExecutionContext, Payload};
use crate::plugin::domain::{
    LegacyPluginOutput, PLUGIN_POST_EXECUTE, PluginDescriptor, permissions,
};
use crate::plugin::ports::{PluginExecutionError, SdkPlugin};
use async_trait::async_trait;

/// Echoes the caller identity and arguments in a process-style result.
#[derive(Debug, Clone)]
pub struct HealthProbePlugin {
    descriptor: PluginDescriptor,
}

impl HealthProbePlugin {
    /// Registered plugin name.
    pub const NAME: &'static str = "health-probe";

    /// Creates the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: PluginDescriptor::new(Self::NAME, "1.0.0")
                .with_permissions([permissions::EXECUTE, permissions::EVENT_PUBLISH])
                .with_extension_points([PLUGIN_POST_EXECUTE])
                .with_description("Built-in SDK plugin for runtime observability checks."),
        }
    }
}

impl Default for HealthProbePlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SdkPlugin for HealthProbePlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        context: &ExecutionContext,
        args: &[String],
    ) -> Result<Payload, PluginExecutionError> {
        let stdout = format!(
            "health-probe actor={} role={} git_provider={} args={}",
            context.actor,
            context.role,
            context.git_provider,
            args.join(" ")
        );
        Ok(LegacyPluginOutput::new(0, stdout, String::new()).into_payload())
    }
}

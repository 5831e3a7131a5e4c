//! Permission-gated plugin execution.

use super::{ExtensionRegistry, PluginError, PluginRegistry, PluginResult};
use crate::audit::ports::AuditLogger;
use crate::context::{ExecutionContext, Payload, into_payload, merge_payloads};
use crate::event_bus::EventBus;
use crate::plugin::domain::{
    ExtensionPoint, LegacyAllowlist, LegacyPluginOutput, PLUGIN_POST_EXECUTE, PLUGIN_PRE_EXECUTE,
    PluginManifest,
};
use crate::plugin::ports::{ExtensionHook, LegacyExecutor, SdkPlugin};
use camino::Utf8PathBuf;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

/// Source label on events published by the framework.
pub const PLUGIN_EVENT_SOURCE: &str = "plugin-framework";

/// Framework settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginFrameworkConfig {
    /// Directory holding legacy executables and discoverable manifests.
    pub plugins_root: Utf8PathBuf,
    /// Legacy plugins that may be auto-registered on first use.
    pub legacy_allowlist: BTreeSet<String>,
}

impl Default for PluginFrameworkConfig {
    fn default() -> Self {
        Self {
            plugins_root: Utf8PathBuf::from("/app/plugins"),
            legacy_allowlist: BTreeSet::new(),
        }
    }
}

/// Resolves, authorizes, dispatches and audits plugin executions.
pub struct PluginFramework {
    bus: Arc<EventBus>,
    audit: Arc<dyn AuditLogger>,
    registry: PluginRegistry,
    extensions: ExtensionRegistry,
    plugins_root: Utf8PathBuf,
    legacy_allowlist: LegacyAllowlist,
    legacy_executor: Option<Arc<dyn LegacyExecutor>>,
}

impl PluginFramework {
    /// Creates a framework without a legacy executor.
    #[must_use]
    pub fn new(bus: Arc<EventBus>, audit: Arc<dyn AuditLogger>, config: PluginFrameworkConfig) -> Self {
        Self {
            bus,
            audit,
            registry: PluginRegistry::new(),
            extensions: ExtensionRegistry::new(),
            plugins_root: config.plugins_root,
            legacy_allowlist: LegacyAllowlist::new(config.legacy_allowlist),
            legacy_executor: None,
        }
    }

    /// Sets the executor used for every plugin without an SDK handler.
    #[must_use]
    pub fn with_legacy_executor(mut self, executor: Arc<dyn LegacyExecutor>) -> Self {
        self.legacy_executor = Some(executor);
        self
    }

    /// Returns the extension point catalog.
    #[must_use]
    pub const fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Loads manifests found under the plugins root and returns how many
    /// were registered.
    #[must_use = "the count reports how many manifests were loaded"]
    pub fn discover_manifests(&self) -> usize {
        self.registry.discover_manifests(&self.plugins_root)
    }

    /// Registers a manifest, replacing any previous one of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidManifest`] when validation fails.
    pub fn register_manifest(&self, manifest: PluginManifest) -> PluginResult<()> {
        Ok(self.registry.register_manifest(manifest, true)?)
    }

    /// Registers an in-process plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidManifest`] when the descriptor does not
    /// yield a valid manifest.
    pub fn register_sdk_plugin(&self, plugin: Arc<dyn SdkPlugin>) -> PluginResult<()> {
        let name = plugin.descriptor().name().to_owned();
        self.registry.register_sdk_plugin(plugin)?;
        tracing::info!(plugin = %name, "sdk plugin registered");
        Ok(())
    }

    /// Adds `name` to the legacy allowlist.
    pub fn allow_legacy_plugin(&self, name: impl Into<String>) {
        self.legacy_allowlist.allow(name);
    }

    /// Returns a handle to the legacy allowlist.
    ///
    /// Executors that keep their own allowlist check should hold this
    /// handle so names allowed at runtime reach them too.
    #[must_use]
    pub const fn legacy_allowlist(&self) -> &LegacyAllowlist {
        &self.legacy_allowlist
    }

    /// Declares an extension point.
    pub fn register_extension_point(&self, name: impl Into<String>, description: impl Into<String>) {
        self.extensions.register_extension_point(name, description);
    }

    /// Returns every declared extension point, sorted by name.
    #[must_use]
    pub fn list_extension_points(&self) -> Vec<ExtensionPoint> {
        self.extensions.list_extension_points()
    }

    /// Attaches a hook to a declared extension point.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::UnknownExtensionPoint`] for undeclared points.
    pub fn register_hook(&self, point: &str, hook: Arc<dyn ExtensionHook>) -> PluginResult<()> {
        self.extensions.register_hook(point, hook)
    }

    /// Awaits every hook attached to `point`.
    pub async fn emit_extension_point(&self, point: &str, payload: &Payload) {
        self.extensions.emit(point, payload).await;
    }

    /// Returns the manifest registered under `name`.
    #[must_use]
    pub fn get_plugin_manifest(&self, name: &str) -> Option<PluginManifest> {
        self.registry.get_manifest(name)
    }

    /// Returns every registered manifest, sorted by name.
    #[must_use]
    pub fn list_plugins(&self) -> Vec<PluginManifest> {
        self.registry.list_manifests()
    }

    /// Runs plugin `name` on behalf of `context`.
    ///
    /// Allowlisted plugins without a manifest are registered as legacy
    /// plugins on first use. The outcome is audited either way.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotRegistered`] for unknown plugins,
    /// [`PluginError::PermissionDenied`] when `required_permission` is not
    /// granted, [`PluginError::ExecutorUnavailable`] when a non-SDK plugin
    /// has no executor, and [`PluginError::ExecutionFailed`] when the plugin
    /// fails.
    pub async fn run_plugin(
        &self,
        name: &str,
        args: &[String],
        context: &ExecutionContext,
        required_permission: &str,
    ) -> PluginResult<Payload> {
        let outcome = self
            .execute(name, args, context, required_permission)
            .await;
        match &outcome {
            Ok(result) => {
                let field = |key: &str| result.get(key).cloned().unwrap_or_else(|| json!("unknown"));
                tracing::info!(plugin = name, request_id = %context.request_id, "plugin executed");
                self.audit.security(
                    "plugin_executed",
                    &context.actor,
                    &into_payload(json!({
                        "plugin": name,
                        "request_id": context.request_id,
                        "status": field("status"),
                        "version": field("version"),
                        "runtime": field("runtime"),
                    })),
                );
            }
            Err(err) => {
                tracing::warn!(plugin = name, request_id = %context.request_id, error = %err, "plugin execution blocked");
                self.audit.security(
                    "plugin_execution_blocked",
                    &context.actor,
                    &into_payload(json!({
                        "plugin": name,
                        "request_id": context.request_id,
                        "reason": err.to_string(),
                    })),
                );
            }
        }
        outcome
    }

    async fn execute(
        &self,
        name: &str,
        args: &[String],
        context: &ExecutionContext,
        required_permission: &str,
    ) -> PluginResult<Payload> {
        let manifest = self.resolve(name)?;
        if !manifest.grants(required_permission) {
            return Err(PluginError::PermissionDenied {
                plugin: manifest.name().to_owned(),
                version: manifest.version().to_owned(),
                permission: required_permission.to_owned(),
            });
        }

        let event_payload = into_payload(json!({
            "plugin": name,
            "version": manifest.version(),
            "runtime": manifest.runtime(),
            "actor": context.actor,
            "request_id": context.request_id,
            "git_provider": context.git_provider,
            "args": args,
        }));
        self.bus
            .publish_from(PLUGIN_PRE_EXECUTE, event_payload.clone(), PLUGIN_EVENT_SOURCE)
            .await;
        self.extensions.emit(PLUGIN_PRE_EXECUTE, &event_payload).await;

        let output = self.dispatch(name, args, context).await?;

        let request_id = if context.request_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            context.request_id.clone()
        };
        let envelope = into_payload(json!({
            "plugin": manifest.name(),
            "version": manifest.version(),
            "runtime": manifest.runtime(),
            "request_id": request_id,
        }));
        let result = merge_payloads(&envelope, &output);

        let mut post_event = event_payload.clone();
        post_event.insert(
            "result_status".to_owned(),
            result.get("status").cloned().unwrap_or_else(|| json!("unknown")),
        );
        self.bus
            .publish_from(PLUGIN_POST_EXECUTE, post_event, PLUGIN_EVENT_SOURCE)
            .await;
        let mut post_hook = event_payload;
        post_hook.insert("result".to_owned(), Value::Object(result.clone()));
        self.extensions.emit(PLUGIN_POST_EXECUTE, &post_hook).await;

        Ok(result)
    }

    fn resolve(&self, name: &str) -> PluginResult<PluginManifest> {
        if let Some(manifest) = self.registry.get_manifest(name) {
            return Ok(manifest);
        }
        if !self.legacy_allowlist.contains(name) {
            return Err(PluginError::NotRegistered(name.to_owned()));
        }
        let legacy = PluginManifest::for_legacy(name, self.plugins_root.as_str());
        let manifest = self.registry.get_or_insert(legacy)?;
        tracing::info!(plugin = name, version = manifest.version(), "legacy plugin auto-registered");
        Ok(manifest)
    }

    async fn dispatch(
        &self,
        name: &str,
        args: &[String],
        context: &ExecutionContext,
    ) -> PluginResult<Payload> {
        if let Some(plugin) = self.registry.get_sdk_plugin(name) {
            return plugin
                .execute(context, args)
                .await
                .map_err(|source| PluginError::ExecutionFailed {
                    plugin: name.to_owned(),
                    source,
                });
        }
        let executor = self
            .legacy_executor
            .as_ref()
            .ok_or(PluginError::ExecutorUnavailable)?;
        executor
            .execute(name, args)
            .await
            .map(LegacyPluginOutput::into_payload)
            .map_err(|source| PluginError::ExecutionFailed {
                plugin: name.to_owned(),
                source,
            })
    }
}

//! Plugin integration tests through the platform.

use std::sync::Arc;

use super::helpers::{args, context, test_platform};
use camino::Utf8PathBuf;
use gitvibe_orchestrator::audit::adapters::InMemoryAuditLog;
use gitvibe_orchestrator::config::OrchestratorConfig;
use gitvibe_orchestrator::error::{Classify, ErrorKind};
use gitvibe_orchestrator::plugin::adapters::HealthProbePlugin;
use gitvibe_orchestrator::plugin::domain::{PluginRuntime, permissions};
use gitvibe_orchestrator::plugin::services::PluginError;
use gitvibe_orchestrator::platform::Platform;
use serde_json::json;
use tempfile::TempDir;

fn plugin_root() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    (dir, root)
}

#[tokio::test(flavor = "multi_thread")]
async fn health_probe_is_registered_and_runs() {
    let harness = test_platform(OrchestratorConfig::default()).await;

    let result = harness
        .platform
        .run_plugin(HealthProbePlugin::NAME, &args(&["ping"]), &context(), permissions::EXECUTE)
        .await
        .expect("probe should run");

    assert_eq!(result.get("plugin"), Some(&json!("health-probe")));
    assert_eq!(result.get("version"), Some(&json!("1.0.0")));
    assert_eq!(result.get("runtime"), Some(&json!("sdk")));
    assert_eq!(result.get("request_id"), Some(&json!("req-int")));
    assert_eq!(result.get("status"), Some(&json!("ok")));
    assert_eq!(harness.audit.events(), vec!["plugin_executed"]);

    let records = harness.audit.records();
    let record = records.first().expect("audit record");
    assert_eq!(record.actor, "octocat");
    assert_eq!(record.details.get("runtime"), Some(&json!("sdk")));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_permission_is_blocked_and_audited() {
    let harness = test_platform(OrchestratorConfig::default()).await;

    let err = harness
        .platform
        .run_plugin(HealthProbePlugin::NAME, &[], &context(), permissions::WRITE_REPO)
        .await
        .expect_err("repo:write is not granted");

    assert!(matches!(err, PluginError::PermissionDenied { .. }));
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(harness.audit.events(), vec!["plugin_execution_blocked"]);
    assert!(
        harness
            .platform
            .recent_events(10)
            .iter()
            .all(|event| event.topic() != "plugin.pre_execute")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_plugin_is_not_found() {
    let harness = test_platform(OrchestratorConfig::default()).await;
    let err = harness
        .platform
        .run_plugin("ghost", &[], &context(), permissions::EXECUTE)
        .await
        .expect_err("not registered");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn discovery_loads_manifests_from_the_plugins_root() {
    let (_dir, root) = plugin_root();
    std::fs::write(
        root.join("review.plugin.json"),
        json!({"name": "review", "version": "2.1.0", "permissions": ["repo:read"]}).to_string(),
    )
    .expect("write flat manifest");
    std::fs::create_dir(root.join("deploy")).expect("create plugin dir");
    std::fs::write(
        root.join("deploy/plugin.json"),
        json!({"name": "deploy", "version": "1.0.0"}).to_string(),
    )
    .expect("write nested manifest");
    std::fs::write(root.join("broken.plugin.json"), "{not json").expect("write junk");

    let config = OrchestratorConfig {
        plugins_root: root.clone(),
        ..OrchestratorConfig::default()
    };
    let platform = Platform::builder(config)
        .with_audit(Arc::new(InMemoryAuditLog::new()))
        .build()
        .await
        .expect("platform with discovery");

    let names: Vec<String> = platform
        .list_plugins()
        .iter()
        .map(|manifest| manifest.name().to_owned())
        .collect();
    assert_eq!(names, vec!["deploy", "health-probe", "review"]);
    let review = platform.get_plugin_manifest("review").expect("review manifest");
    assert_eq!(review.runtime(), PluginRuntime::Process);
    assert!(review.grants(permissions::READ_REPO));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn allowlisted_legacy_plugin_runs_in_the_sandbox() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, root) = plugin_root();
    let script = root.join("lint.sh");
    std::fs::write(&script, "#!/bin/sh\necho \"linted $*\"\n").expect("write script");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).expect("chmod");

    let mut config = OrchestratorConfig::from_lookup(|key| match key {
        "PLUGIN_SANDBOX_ENABLED" => Some("true".to_owned()),
        "PLUGIN_ALLOWLIST" => Some("lint.sh".to_owned()),
        _ => None,
    });
    config.plugins_root = root.clone();
    config.sandbox.plugins_root = root;
    config.sandbox.limits.processes = 4096;
    let harness = test_platform(config).await;

    let result = harness
        .platform
        .run_plugin("lint.sh", &args(&["src"]), &context(), permissions::EXECUTE)
        .await
        .expect("legacy plugin should run");

    assert_eq!(result.get("runtime"), Some(&json!("legacy")));
    assert_eq!(result.get("version"), Some(&json!("0.1.0-legacy")));
    assert_eq!(result.get("status"), Some(&json!("ok")));
    assert_eq!(result.get("stdout"), Some(&json!("linted src\n")));
    let manifest = harness
        .platform
        .get_plugin_manifest("lint.sh")
        .expect("auto-registered manifest");
    assert_eq!(manifest.runtime(), PluginRuntime::Legacy);
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_plugin_allowed_at_runtime_reaches_the_sandbox() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, root) = plugin_root();
    let script = root.join("fmt.sh");
    std::fs::write(&script, "#!/bin/sh\necho formatted\n").expect("write script");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).expect("chmod");

    let mut config = OrchestratorConfig::from_lookup(|key| {
        (key == "PLUGIN_SANDBOX_ENABLED").then(|| "true".to_owned())
    });
    config.plugins_root = root.clone();
    config.sandbox.plugins_root = root;
    config.sandbox.limits.processes = 4096;
    let harness = test_platform(config).await;

    let err = harness
        .platform
        .run_plugin("fmt.sh", &[], &context(), permissions::EXECUTE)
        .await
        .expect_err("not allowlisted yet");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    harness.platform.plugins().allow_legacy_plugin("fmt.sh");
    let result = harness
        .platform
        .run_plugin("fmt.sh", &[], &context(), permissions::EXECUTE)
        .await
        .expect("newly allowlisted plugin should run in the sandbox");

    assert_eq!(result.get("status"), Some(&json!("ok")));
    assert_eq!(result.get("stdout"), Some(&json!("formatted\n")));
}

#[tokio::test(flavor = "multi_thread")]
async fn legacy_plugin_fails_closed_when_the_sandbox_is_disabled() {
    let (_dir, root) = plugin_root();
    let mut config = OrchestratorConfig::from_lookup(|key| {
        (key == "PLUGIN_ALLOWLIST").then(|| "lint.sh".to_owned())
    });
    config.plugins_root = root;
    let harness = test_platform(config).await;

    let err = harness
        .platform
        .run_plugin("lint.sh", &[], &context(), permissions::EXECUTE)
        .await
        .expect_err("sandbox disabled");

    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(err.to_string(), "Plugin sandbox is disabled by default.");
    assert_eq!(harness.audit.events(), vec!["plugin_execution_blocked"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn snapshot_lists_registries() {
    let harness = test_platform(OrchestratorConfig::default()).await;
    let snapshot = harness.platform.snapshot();

    assert_eq!(snapshot.plugins.len(), 1);
    let points: Vec<&str> = snapshot
        .extension_points
        .iter()
        .map(|point| point.name.as_str())
        .collect();
    assert_eq!(
        points,
        vec![
            "plugin.post_execute",
            "plugin.pre_execute",
            "workflow.after_step",
            "workflow.before_step",
        ]
    );
    assert!(snapshot.agents.is_empty());
    assert!(snapshot.workflows.is_empty());
    assert!(snapshot.job_handlers.is_empty());
}

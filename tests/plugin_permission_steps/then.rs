//! Then steps for plugin permission BDD scenarios.

use super::world::PluginWorld;
use gitvibe_orchestrator::error::Classify;
use rstest_bdd_macros::then;
use serde_json::json;

#[then(r#"the run succeeds with status "{status}""#)]
fn run_succeeds(world: &PluginWorld, status: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing run result in scenario world"))?;
    let payload = result
        .as_ref()
        .map_err(|err| eyre::eyre!("expected success, got {err}"))?;
    if payload.get("status") != Some(&json!(status)) {
        return Err(eyre::eyre!("expected status '{status}', got {payload:?}"));
    }
    Ok(())
}

#[then(r#"the run is rejected as "{kind}""#)]
fn run_rejected(world: &PluginWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing run result in scenario world"))?;
    match result {
        Ok(payload) => Err(eyre::eyre!("expected rejection, got {payload:?}")),
        Err(err) if err.kind().as_str() == kind => Ok(()),
        Err(err) => Err(eyre::eyre!(
            "expected '{kind}' rejection, got '{}': {err}",
            err.kind()
        )),
    }
}

#[then(r#"the audit log records "{event}""#)]
fn audit_records(world: &PluginWorld, event: String) -> Result<(), eyre::Report> {
    let events = world.audit.events();
    if !events.contains(&event) {
        return Err(eyre::eyre!("expected audit event '{event}', got {events:?}"));
    }
    Ok(())
}

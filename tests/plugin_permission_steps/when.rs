//! When steps for plugin permission BDD scenarios.

use super::world::{PluginWorld, run_async, scenario_context};
use rstest_bdd_macros::when;

#[when(r#"the plugin "{name}" is run requiring "{permission}""#)]
fn run_plugin(world: &mut PluginWorld, name: String, permission: String) -> Result<(), eyre::Report> {
    let result = run_async(world.platform()?.run_plugin(
        &name,
        &[],
        &scenario_context(),
        &permission,
    ));
    world.last_result = Some(result);
    Ok(())
}

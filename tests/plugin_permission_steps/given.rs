//! Given steps for plugin permission BDD scenarios.

use super::world::{PluginWorld, build_platform};
use eyre::WrapErr;
use gitvibe_orchestrator::plugin::domain::PluginManifest;
use rstest_bdd_macros::given;

#[given("a platform with the built-in plugins")]
fn platform_with_builtins(world: &mut PluginWorld) -> Result<(), eyre::Report> {
    let platform = build_platform(world.audit.clone())?;
    world.platform = Some(platform);
    Ok(())
}

#[given(r#"a manifest for "{name}" granting "{permission}""#)]
fn manifest_granting(
    world: &mut PluginWorld,
    name: String,
    permission: String,
) -> Result<(), eyre::Report> {
    let manifest = PluginManifest::new(name, "1.0.0").with_permissions([permission]);
    world
        .platform()?
        .plugins()
        .register_manifest(manifest)
        .wrap_err("register scenario manifest")
}

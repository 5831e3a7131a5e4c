//! When steps for job queue BDD scenarios.

use super::world::{QueueWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the queue processes the next job")]
fn process_next(world: &mut QueueWorld) -> Result<(), eyre::Report> {
    let processed = run_async(world.platform()?.jobs().process_next())
        .wrap_err("processing pass")?;
    world.last_processed = processed;
    Ok(())
}

#[when("{seconds:i64} seconds pass")]
fn seconds_pass(world: &mut QueueWorld, seconds: i64) {
    world.clock.advance_seconds(seconds);
}

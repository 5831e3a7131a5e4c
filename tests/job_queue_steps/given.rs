//! Given steps for job queue BDD scenarios.

use super::world::{QueueWorld, build_platform, run_async};
use eyre::WrapErr;
use gitvibe_orchestrator::context::Payload;
use gitvibe_orchestrator::job_queue::ports::{JobHandlerError, handler_fn};
use rstest_bdd_macros::given;

#[given("an empty queue")]
fn empty_queue(world: &mut QueueWorld) -> Result<(), eyre::Report> {
    world.platform = Some(build_platform(world.clock.clone())?);
    Ok(())
}

#[given(r#"a queue with an "{job_type}" handler that succeeds"#)]
fn queue_with_succeeding_handler(world: &mut QueueWorld, job_type: String) -> Result<(), eyre::Report> {
    let platform = build_platform(world.clock.clone())?;
    platform.register_job_handler(job_type, handler_fn(|input: Payload| async move { Ok(input) }));
    world.platform = Some(platform);
    Ok(())
}

#[given(r#"a queue with a "{job_type}" handler that always fails"#)]
fn queue_with_failing_handler(world: &mut QueueWorld, job_type: String) -> Result<(), eyre::Report> {
    let platform = build_platform(world.clock.clone())?;
    platform.register_job_handler(
        job_type,
        handler_fn(|_input: Payload| async move { Err(JobHandlerError::new("upstream unavailable")) }),
    );
    world.platform = Some(platform);
    Ok(())
}

#[given(r#"a queued "{job_type}" job with {retries:u32} retries"#)]
fn queued_job(world: &mut QueueWorld, job_type: String, retries: u32) -> Result<(), eyre::Report> {
    let job = run_async(world.platform()?.enqueue_job(&job_type, Payload::new(), retries))
        .wrap_err("enqueue scenario job")?;
    world.job_id = Some(job.id);
    Ok(())
}

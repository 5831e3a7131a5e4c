//! Then steps for job queue BDD scenarios.

use super::world::{QueueWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;

#[then(r#"the job status is "{status}""#)]
fn job_status(world: &QueueWorld, status: String) -> Result<(), eyre::Report> {
    let job = world.job()?;
    if job.status.as_str() != status {
        return Err(eyre::eyre!("expected status '{status}', got '{}'", job.status.as_str()));
    }
    Ok(())
}

#[then("the job has {attempts:u32} attempts")]
fn job_attempts(world: &QueueWorld, attempts: u32) -> Result<(), eyre::Report> {
    let job = world.job()?;
    if job.attempts != attempts {
        return Err(eyre::eyre!("expected {attempts} attempts, got {}", job.attempts));
    }
    Ok(())
}

#[then("the next pass dispatches nothing")]
fn next_pass_idle(world: &QueueWorld) -> Result<(), eyre::Report> {
    let processed = run_async(world.platform()?.jobs().process_next())
        .wrap_err("idle processing pass")?;
    if let Some(job) = processed {
        return Err(eyre::eyre!("expected no dispatch, got job {}", job.id));
    }
    Ok(())
}

#[then(r#"the last error is "{message}""#)]
fn last_error(world: &QueueWorld, message: String) -> Result<(), eyre::Report> {
    let job = world.job()?;
    if job.last_error.as_deref() != Some(message.as_str()) {
        return Err(eyre::eyre!(
            "expected last error '{message}', got {:?}",
            job.last_error
        ));
    }
    Ok(())
}

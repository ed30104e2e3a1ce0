//! When steps for nudge escalation BDD scenarios.

use super::world::{EscalationWorld, run_async};
use chrono::TimeDelta;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("{hours:i64} hours pass and the reminder worker runs")]
fn worker_runs_after(world: &mut EscalationWorld, hours: i64) -> Result<(), eyre::Report> {
    world.backend.clock.advance(TimeDelta::hours(hours));
    let report = run_async(world.worker.process_reminders()).wrap_err("run reminder cycle")?;
    if let Some(err) = report.errors.first() {
        return Err(eyre::eyre!("reminder cycle reported an error: {err}"));
    }
    Ok(())
}

#[when("the task is completed")]
fn task_is_completed(world: &mut EscalationWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    run_async(world.backend.lifecycle.complete_task(task_id)).wrap_err("complete task")?;
    Ok(())
}

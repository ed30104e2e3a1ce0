//! Given steps for nudge escalation BDD scenarios.

use super::world::{EscalationWorld, run_async};
use crate::test_helpers::epoch;
use chrono::TimeDelta;
use eyre::WrapErr;
use nudge::task::domain::{TaskDraft, TaskPriority, UserId};
use rstest_bdd_macros::given;

#[given("a medium priority task due in {hours:i64} hours")]
fn medium_priority_task(world: &mut EscalationWorld, hours: i64) -> Result<(), eyre::Report> {
    let draft = TaskDraft::new(UserId::new(7), "Renew passport")
        .with_priority(TaskPriority::Medium)
        .with_due_date(epoch() + TimeDelta::hours(hours));
    let task = run_async(world.backend.lifecycle.create_task(draft))
        .wrap_err("create task for escalation scenario")?;
    world.task_id = Some(task.id());
    Ok(())
}

#[given("nudging is disabled for the task owner")]
fn nudging_disabled(world: &mut EscalationWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let task = run_async(world.backend.lifecycle.find_task(task_id))?;
    run_async(world.backend.lifecycle.update_nudge_settings(
        task.owner(),
        TimeDelta::hours(1),
        3,
        false,
    ))
    .wrap_err("disable nudging")?;
    Ok(())
}

//! Given steps for task status transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use crate::test_helpers::epoch;
use chrono::TimeDelta;
use eyre::WrapErr;
use nudge::task::{
    domain::{TaskDraft, UserId},
    services::TransitionTaskRequest,
};
use rstest_bdd_macros::given;

#[given(r#"an active task "{title}" due in {hours:i64} hours"#)]
fn active_task(
    world: &mut TaskTransitionWorld,
    title: String,
    hours: i64,
) -> Result<(), eyre::Report> {
    let draft =
        TaskDraft::new(UserId::new(1), title).with_due_date(epoch() + TimeDelta::hours(hours));
    let created = run_async(world.service.create_task(draft))
        .wrap_err("create task for transition scenario")?;
    world.last_task = Some(created);
    Ok(())
}

#[given(r#"the task has been transitioned to "{target_status}""#)]
fn task_has_been_transitioned(
    world: &mut TaskTransitionWorld,
    target_status: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let transitioned = run_async(
        world
            .service
            .transition_task(TransitionTaskRequest::new(task_id, target_status)),
    )
    .wrap_err("transition task in scenario setup")?;

    world.last_task = Some(transitioned);
    Ok(())
}

//! Then steps for task status transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use nudge::task::{
    domain::{TaskDomainError, TaskStatus},
    services::TaskLifecycleError,
};
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskTransitionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task()?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then("the pending reminder count is {count:usize}")]
fn pending_reminder_count(world: &TaskTransitionWorld, count: usize) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let pending = run_async(world.service.pending_reminders(task_id))?;

    if pending.len() != count {
        return Err(eyre::eyre!(
            "expected {count} pending reminders, found {}",
            pending.len()
        ));
    }
    Ok(())
}

#[then("the transition fails with an invalid transition error")]
fn transition_fails_with_invalid_transition(
    world: &TaskTransitionWorld,
) -> Result<(), eyre::Report> {
    let result = world
        .last_transition_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;

    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidTransition { .. }
        ))
    ) {
        return Err(eyre::eyre!(
            "expected InvalidTransition error, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the transition fails with an invalid status error")]
fn transition_fails_with_invalid_status(world: &TaskTransitionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_transition_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;

    if !matches!(result, Err(TaskLifecycleError::InvalidStatus(_))) {
        return Err(eyre::eyre!("expected InvalidStatus error, got {result:?}"));
    }
    Ok(())
}

//! Then steps for nudge escalation BDD scenarios.

use super::world::{EscalationWorld, run_async};
use crate::test_helpers::epoch;
use chrono::TimeDelta;
use nudge::reminder::domain::{Reminder, ReminderKind};
use rstest_bdd_macros::then;

fn pending_nudges(world: &EscalationWorld) -> Result<Vec<Reminder>, eyre::Report> {
    let task_id = world.task_id()?;
    let pending = run_async(world.backend.lifecycle.pending_reminders(task_id))?;
    Ok(pending
        .into_iter()
        .filter(|reminder| reminder.kind() == ReminderKind::Nudge)
        .collect())
}

#[then("{count:u64} reminder has been delivered")]
fn reminders_delivered(world: &EscalationWorld, count: u64) -> Result<(), eyre::Report> {
    let processed = world.worker.metrics().snapshot().reminders_processed;
    if processed != count {
        return Err(eyre::eyre!(
            "expected {count} delivered reminders, found {processed}"
        ));
    }
    Ok(())
}

#[then("a nudge is scheduled {hours:i64} hours after the task was created")]
fn nudge_scheduled_at(world: &EscalationWorld, hours: i64) -> Result<(), eyre::Report> {
    let nudges = pending_nudges(world)?;
    let expected = epoch() + TimeDelta::hours(hours);
    let scheduled: Vec<_> = nudges.iter().map(Reminder::scheduled_at).collect();
    if scheduled != vec![expected] {
        return Err(eyre::eyre!(
            "expected one nudge at {expected}, found {scheduled:?}"
        ));
    }
    Ok(())
}

#[then("no nudge is scheduled")]
fn no_nudge_scheduled(world: &EscalationWorld) -> Result<(), eyre::Report> {
    let nudges = pending_nudges(world)?;
    if !nudges.is_empty() {
        return Err(eyre::eyre!("expected no pending nudges, found {}", nudges.len()));
    }
    Ok(())
}

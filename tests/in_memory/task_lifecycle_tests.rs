//! In-memory integration tests for task lifecycle operations.

use super::helpers::{Backend, backend};
use crate::test_helpers::epoch;
use chrono::TimeDelta;
use eyre::ensure;
use nudge::reminder::{domain::NudgeEvent, ports::ReminderRepository};
use nudge::task::{
    domain::{TaskDraft, TaskPriority, TaskStatus, UserId},
    ports::TaskFilter,
    services::TransitionTaskRequest,
};
use rstest::rstest;

const OWNER: UserId = UserId::new(314);

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_round_trip_through_every_status(backend: Backend) -> eyre::Result<()> {
    let task = backend
        .lifecycle
        .create_task(
            TaskDraft::new(OWNER, "Book dentist")
                .with_due_date(epoch() + TimeDelta::days(2))
                .with_priority(TaskPriority::Low),
        )
        .await?;

    let snoozed = backend
        .lifecycle
        .snooze_task(task.id(), epoch() + TimeDelta::days(3))
        .await?;
    ensure!(snoozed.status() == TaskStatus::Snoozed);

    let completed = backend.lifecycle.complete_task(task.id()).await?;
    ensure!(completed.completed_at().is_some());

    let reactivated = backend
        .lifecycle
        .transition_task(TransitionTaskRequest::new(task.id(), "active"))
        .await?;
    ensure!(reactivated.completed_at().is_none());

    let deleted = backend.lifecycle.delete_task(task.id()).await?;
    ensure!(deleted.status() == TaskStatus::Deleted);

    let names: Vec<&str> = backend.events.events().iter().map(NudgeEvent::name).collect();
    ensure!(
        names == ["task_snoozed", "task_completed", "task_reactivated", "task_deleted"],
        "unexpected events {names:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_a_task_leaves_only_sent_reminders(backend: Backend) -> eyre::Result<()> {
    let task = backend
        .lifecycle
        .create_task(
            TaskDraft::new(OWNER, "File taxes").with_due_date(epoch() + TimeDelta::hours(1)),
        )
        .await?;
    let initial = backend.reminders.list_by_task(task.id()).await?;
    ensure!(initial.len() == 1);
    ensure!(backend.reminders.mark_sent(initial[0].id(), epoch()).await?);
    let nudge = nudge::reminder::domain::Reminder::nudge_after(
        &initial[0],
        epoch() + TimeDelta::hours(2),
    );
    backend.reminders.create(&nudge).await?;

    backend.lifecycle.complete_task(task.id()).await?;

    let remaining = backend.reminders.list_by_task(task.id()).await?;
    ensure!(remaining.len() == 1);
    ensure!(remaining[0].id() == initial[0].id());
    ensure!(remaining[0].sent_at() == Some(epoch()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_by_status(backend: Backend) -> eyre::Result<()> {
    let first = backend
        .lifecycle
        .create_task(TaskDraft::new(OWNER, "First"))
        .await?;
    backend
        .lifecycle
        .create_task(TaskDraft::new(OWNER, "Second"))
        .await?;
    backend.lifecycle.complete_task(first.id()).await?;

    let active = backend
        .lifecycle
        .list_tasks(OWNER, &TaskFilter::default().with_status(TaskStatus::Active))
        .await?;
    let completed = backend
        .lifecycle
        .list_tasks(OWNER, &TaskFilter::default().with_status(TaskStatus::Completed))
        .await?;

    ensure!(active.len() == 1 && active[0].title() == "Second");
    ensure!(completed.len() == 1 && completed[0].id() == first.id());
    Ok(())
}

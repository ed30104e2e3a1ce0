//! End-to-end scheduler tests over the in-memory adapters.

use super::helpers::{Backend, backend};
use crate::test_helpers::{ManualClock, epoch};
use chrono::TimeDelta;
use eyre::ensure;
use nudge::reminder::{
    domain::{NudgeEvent, ReminderKind},
    ports::ReminderRepository,
};
use nudge::scheduler::{ReminderScheduler, SchedulerConfig};
use nudge::task::domain::{TaskDraft, UserId};
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config() -> SchedulerConfig {
    SchedulerConfig {
        poll_interval: Duration::from_millis(25),
        worker_count: 3,
        shutdown_timeout: Duration::from_secs(2),
        ..SchedulerConfig::default()
    }
}

async fn run_for(scheduler: &ReminderScheduler<ManualClock>, period: Duration) -> eyre::Result<()> {
    let shutdown = CancellationToken::new();
    scheduler.start(&shutdown)?;
    tokio::time::sleep(period).await;
    scheduler.stop().await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn escalation_follows_nudge_budget(backend: Backend) -> eyre::Result<()> {
    let owner = UserId::new(99);
    let task = backend
        .lifecycle
        .create_task(
            TaskDraft::new(owner, "Renew insurance").with_due_date(epoch() + TimeDelta::hours(24)),
        )
        .await?;
    let scheduler = ReminderScheduler::new(
        config(),
        backend.scheduler_ports(),
        Arc::new(backend.clock.clone()),
    )?;

    // Initial reminder, then three nudges two hours apart.
    for offset in [23, 2, 2, 2, 2] {
        backend.clock.advance(TimeDelta::hours(offset));
        run_for(&scheduler, Duration::from_millis(120)).await?;
    }

    let reminders = backend.reminders.list_by_task(task.id()).await?;
    let kinds: Vec<ReminderKind> = reminders.iter().map(|reminder| reminder.kind()).collect();
    ensure!(
        kinds == [
            ReminderKind::Initial,
            ReminderKind::Nudge,
            ReminderKind::Nudge,
            ReminderKind::Nudge
        ],
        "unexpected reminders {kinds:?}"
    );
    ensure!(reminders.iter().all(|reminder| reminder.sent_at().is_some()));

    let delivered = backend
        .events
        .events()
        .iter()
        .filter(|event| matches!(event, NudgeEvent::ReminderDue { .. }))
        .count();
    ensure!(delivered >= 4);
    let snapshot = scheduler.metrics().snapshot();
    ensure!(snapshot.reminders_processed == 4);
    ensure!(snapshot.nudges_created == 3);
    ensure!(snapshot.processing_errors == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_a_task_stops_escalation(backend: Backend) -> eyre::Result<()> {
    let task = backend
        .lifecycle
        .create_task(
            TaskDraft::new(UserId::new(7), "Return library book")
                .with_due_date(epoch() + TimeDelta::hours(1)),
        )
        .await?;
    let scheduler = ReminderScheduler::new(
        config(),
        backend.scheduler_ports(),
        Arc::new(backend.clock.clone()),
    )?;

    run_for(&scheduler, Duration::from_millis(120)).await?;
    backend.lifecycle.complete_task(task.id()).await?;
    backend.clock.advance(TimeDelta::hours(6));
    run_for(&scheduler, Duration::from_millis(120)).await?;

    let reminders = backend.reminders.list_by_task(task.id()).await?;
    ensure!(reminders.len() == 1, "only the delivered initial reminder remains");
    ensure!(scheduler.metrics().snapshot().reminders_processed == 1);
    Ok(())
}

//! Harness and port doubles shared by scheduler tests.

use crate::reminder::{
    adapters::memory::{InMemoryReminderRepository, RecordingEventSink},
    domain::{NudgeEvent, NudgeSettings, Reminder, ReminderId},
    ports::{EventSinkError, ReminderEventSink, ReminderRepository, ReminderRepositoryResult},
};
use crate::scheduler::{ReminderWorker, SchedulerMetrics, SchedulerPorts};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskDraft, TaskId, UserId},
    services::TaskLifecycleService,
};
use crate::test_support::{ManualClock, epoch};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockall::mock;
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Reminders {}

    #[async_trait]
    impl ReminderRepository for Reminders {
        async fn create(&self, reminder: &Reminder) -> ReminderRepositoryResult<()>;
        async fn find_due(&self, now: DateTime<Utc>) -> ReminderRepositoryResult<Vec<Reminder>>;
        async fn mark_sent(
            &self,
            id: ReminderId,
            sent_at: DateTime<Utc>,
        ) -> ReminderRepositoryResult<bool>;
        async fn create_nudge_within_budget(
            &self,
            nudge: &Reminder,
            max_nudges: u32,
        ) -> ReminderRepositoryResult<bool>;
        async fn list_by_task(&self, task_id: TaskId) -> ReminderRepositoryResult<Vec<Reminder>>;
        async fn delete(&self, id: ReminderId) -> ReminderRepositoryResult<()>;
        async fn find_settings(
            &self,
            user_id: UserId,
        ) -> ReminderRepositoryResult<Option<NudgeSettings>>;
        async fn upsert_settings(&self, settings: &NudgeSettings) -> ReminderRepositoryResult<()>;
        async fn create_settings_if_absent(
            &self,
            settings: &NudgeSettings,
        ) -> ReminderRepositoryResult<NudgeSettings>;
    }
}

mock! {
    pub Sink {}

    #[async_trait]
    impl ReminderEventSink for Sink {
        async fn publish(&self, event: &NudgeEvent) -> Result<(), EventSinkError>;
    }
}

/// Event sink that panics on every publish.
pub struct PanickingSink;

#[async_trait]
impl ReminderEventSink for PanickingSink {
    async fn publish(&self, _event: &NudgeEvent) -> Result<(), EventSinkError> {
        panic!("sink crashed while delivering");
    }
}

/// Event sink whose publish outlasts any reasonable shutdown budget.
pub struct StallingSink {
    pub delay: Duration,
}

#[async_trait]
impl ReminderEventSink for StallingSink {
    async fn publish(&self, _event: &NudgeEvent) -> Result<(), EventSinkError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

pub type TestLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryReminderRepository,
    RecordingEventSink,
    ManualClock,
>;

/// In-memory ports plus a lifecycle service writing into them.
pub struct Harness {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub reminders: Arc<InMemoryReminderRepository>,
    pub events: Arc<RecordingEventSink>,
    pub clock: ManualClock,
    pub lifecycle: TestLifecycle,
}

impl Harness {
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let reminders = Arc::new(InMemoryReminderRepository::new());
        let events = Arc::new(RecordingEventSink::new());
        let clock = ManualClock::default();
        let lifecycle = TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&reminders),
            Arc::clone(&events),
            Arc::new(clock.clone()),
        );
        Self {
            tasks,
            reminders,
            events,
            clock,
            lifecycle,
        }
    }

    pub fn ports(&self) -> SchedulerPorts {
        SchedulerPorts::new(
            self.tasks.clone(),
            self.reminders.clone(),
            self.events.clone(),
        )
    }

    pub fn worker(&self) -> ReminderWorker<ManualClock> {
        ReminderWorker::new(
            self.ports(),
            Arc::new(self.clock.clone()),
            Arc::new(SchedulerMetrics::new(1)),
        )
    }

    /// Creates a medium-priority task for user 5 due `hours` after the epoch.
    pub async fn task_due_in(&self, hours: i64) -> TaskId {
        self.lifecycle
            .create_task(
                TaskDraft::new(UserId::new(5), "Pay rent")
                    .with_due_date(epoch() + TimeDelta::hours(hours)),
            )
            .await
            .expect("task creation should succeed")
            .id()
    }
}

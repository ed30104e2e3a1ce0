//! Shared wiring for in-memory integration tests.

use crate::test_helpers::ManualClock;
use nudge::reminder::adapters::memory::{InMemoryReminderRepository, RecordingEventSink};
use nudge::scheduler::SchedulerPorts;
use nudge::task::{adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService};
use rstest::fixture;
use std::sync::Arc;

/// Lifecycle service over the in-memory adapters.
pub type MemoryLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryReminderRepository,
    RecordingEventSink,
    ManualClock,
>;

/// In-memory adapters shared between the lifecycle service and a scheduler.
pub struct Backend {
    /// Task store.
    pub tasks: Arc<InMemoryTaskRepository>,
    /// Reminder and settings store.
    pub reminders: Arc<InMemoryReminderRepository>,
    /// Event recorder.
    pub events: Arc<RecordingEventSink>,
    /// Scenario clock.
    pub clock: ManualClock,
    /// Lifecycle service writing into the stores.
    pub lifecycle: MemoryLifecycle,
}

impl Backend {
    /// Returns the ports for a scheduler sharing these stores.
    pub fn scheduler_ports(&self) -> SchedulerPorts {
        SchedulerPorts::new(
            self.tasks.clone(),
            self.reminders.clone(),
            self.events.clone(),
        )
    }
}

/// Provides fresh in-memory adapters for each test.
#[fixture]
pub fn backend() -> Backend {
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
    Backend {
        tasks,
        reminders,
        events,
        clock,
        lifecycle,
    }
}

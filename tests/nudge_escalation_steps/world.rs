//! Scenario world pairing the in-memory backend with a reminder worker.

use std::sync::Arc;

use crate::helpers::{Backend, backend};
use crate::test_helpers::ManualClock;
use nudge::scheduler::{ReminderWorker, SchedulerMetrics};
use nudge::task::domain::TaskId;
use rstest::fixture;

/// Scenario world for nudge escalation behaviour tests.
pub struct EscalationWorld {
    pub backend: Backend,
    pub worker: ReminderWorker<ManualClock>,
    pub task_id: Option<TaskId>,
}

impl EscalationWorld {
    /// Builds a single worker over fresh in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let shared = backend();
        let worker = ReminderWorker::new(
            shared.scheduler_ports(),
            Arc::new(shared.clock.clone()),
            Arc::new(SchedulerMetrics::new(1)),
        );
        Self {
            backend: shared,
            worker,
            task_id: None,
        }
    }

    /// Returns the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }
}

impl Default for EscalationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> EscalationWorld {
    EscalationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

//! Service layer for task intake, status transitions, and their reminder
//! side effects.

use crate::reminder::{
    domain::{DEFAULT_NUDGE_INTERVAL_SECS, NudgeEvent, NudgeSettings, Reminder, ReminderKind},
    policy::NudgePolicy,
    ports::{ReminderEventSink, ReminderRepository, ReminderRepositoryError},
    services::get_or_create_settings,
};
use crate::task::{
    domain::{
        ParseTaskStatusError, Task, TaskDomainError, TaskDraft, TaskId, TaskStatus, UserId,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for a status transition named by string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTaskRequest {
    task_id: TaskId,
    target_status: String,
}

impl TransitionTaskRequest {
    /// Creates a transition request.
    #[must_use]
    pub fn new(task_id: TaskId, target_status: impl Into<String>) -> Self {
        Self {
            task_id,
            target_status: target_status.into(),
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or transition rules rejected the operation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Reminder repository operation failed.
    #[error(transparent)]
    Reminder(#[from] ReminderRepositoryError),
    /// The requested status name is not recognised.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Keeps reminders consistent with task status: closing a task cancels its
/// unsent reminders, snoozing re-arms a reminder at the snooze instant, and
/// reactivating a dated task reschedules its initial reminder.
#[derive(Clone)]
pub struct TaskLifecycleService<T, R, E, C>
where
    T: TaskRepository,
    R: ReminderRepository,
    E: ReminderEventSink,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    reminders: Arc<R>,
    events: Arc<E>,
    clock: Arc<C>,
    policy: NudgePolicy,
    default_nudge_interval: TimeDelta,
}

impl<T, R, E, C> TaskLifecycleService<T, R, E, C>
where
    T: TaskRepository,
    R: ReminderRepository,
    E: ReminderEventSink,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service with the standard nudge policy.
    #[must_use]
    pub fn new(tasks: Arc<T>, reminders: Arc<R>, events: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            reminders,
            events,
            clock,
            policy: NudgePolicy::default(),
            default_nudge_interval: TimeDelta::seconds(DEFAULT_NUDGE_INTERVAL_SECS),
        }
    }

    /// Replaces the nudge policy used to time initial reminders.
    #[must_use]
    pub const fn with_policy(mut self, policy: NudgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the interval stored in lazily created nudge settings.
    #[must_use]
    pub const fn with_default_nudge_interval(mut self, interval: TimeDelta) -> Self {
        self.default_nudge_interval = interval;
        self
    }

    /// Creates an active task and schedules its initial reminder when it has
    /// a due date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when validation fails or persistence
    /// rejects the task or reminder.
    pub async fn create_task(&self, draft: TaskDraft) -> TaskLifecycleResult<Task> {
        let task = Task::new(draft, &*self.clock)?;
        self.tasks.store(&task).await?;
        if task.due_date().is_some() {
            self.schedule_initial_reminder(&task).await?;
        }
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Lists an owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_tasks(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list_by_owner(owner, filter).await?)
    }

    /// Completes a task and cancels its unsent reminders.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] (wrapped) when already
    /// completed, transition errors, or persistence errors.
    pub async fn complete_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task(task_id).await?;
        task.complete(&*self.clock)?;
        self.apply_transition(&task).await?;
        Ok(task)
    }

    /// Snoozes a task until `until`, re-arming its reminder at that instant.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `until` is not in the future,
    /// transition errors, or persistence errors.
    pub async fn snooze_task(
        &self,
        task_id: TaskId,
        until: DateTime<Utc>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task(task_id).await?;
        task.snooze(until, &*self.clock)?;
        self.apply_transition(&task).await?;
        Ok(task)
    }

    /// Soft deletes a task and cancels its unsent reminders.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyDeleted`] (wrapped) when already
    /// deleted, or persistence errors.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task(task_id).await?;
        task.delete(&*self.clock)?;
        self.apply_transition(&task).await?;
        Ok(task)
    }

    /// Reactivates a task, rescheduling its initial reminder when dated.
    ///
    /// Reactivating an active task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns persistence errors.
    pub async fn reactivate_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task(task_id).await?;
        if task.status() == TaskStatus::Active {
            return Ok(task);
        }
        task.reactivate(&*self.clock)?;
        self.apply_transition(&task).await?;
        Ok(task)
    }

    /// Moves a task to the status named in the request.
    ///
    /// Requesting the current status is a no-op. Snoozing needs a wake-up
    /// time and is rejected here; use [`Self::snooze_task`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidStatus`] for unknown status
    /// names, domain errors for illegal transitions, or persistence errors.
    pub async fn transition_task(
        &self,
        request: TransitionTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let target = TaskStatus::try_from(request.target_status.as_str())?;
        let mut task = self.find_task(request.task_id).await?;
        if task.status() == target {
            return Ok(task);
        }
        task.transition_to(target, &*self.clock)?;
        self.apply_transition(&task).await?;
        Ok(task)
    }

    /// Returns a user's nudge settings, creating defaults on first access.
    ///
    /// # Errors
    ///
    /// Returns reminder repository errors.
    pub async fn nudge_settings(&self, user_id: UserId) -> TaskLifecycleResult<NudgeSettings> {
        Ok(get_or_create_settings(
            &*self.reminders,
            user_id,
            self.default_nudge_interval,
            &*self.clock,
        )
        .await?)
    }

    /// Replaces a user's nudge settings.
    ///
    /// # Errors
    ///
    /// Returns reminder repository errors.
    pub async fn update_nudge_settings(
        &self,
        user_id: UserId,
        nudge_interval: TimeDelta,
        max_nudges: u32,
        enabled: bool,
    ) -> TaskLifecycleResult<NudgeSettings> {
        let mut settings = self.nudge_settings(user_id).await?;
        settings.update(nudge_interval, max_nudges, enabled, &*self.clock);
        self.reminders.upsert_settings(&settings).await?;
        Ok(settings)
    }

    /// Returns unsent reminders of a task.
    ///
    /// # Errors
    ///
    /// Returns reminder repository errors.
    pub async fn pending_reminders(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<Reminder>> {
        let reminders = self.reminders.list_by_task(task_id).await?;
        Ok(reminders
            .into_iter()
            .filter(Reminder::is_pending)
            .collect())
    }

    /// Persists a transitioned task and applies its reminder side effects.
    async fn apply_transition(&self, task: &Task) -> TaskLifecycleResult<()> {
        self.tasks.update(task).await?;
        let cancelled = self.cancel_pending_reminders(task.id()).await?;
        match task.status() {
            TaskStatus::Completed | TaskStatus::Deleted => {}
            TaskStatus::Snoozed => {
                if let Some(until) = task.due_date() {
                    let reminder = Reminder::for_task(task, until, ReminderKind::Initial);
                    self.reminders.create(&reminder).await?;
                }
            }
            TaskStatus::Active => {
                if task.due_date().is_some() {
                    self.schedule_initial_reminder(task).await?;
                }
            }
        }
        tracing::debug!(
            task_id = %task.id(),
            status = %task.status(),
            cancelled,
            "task transition applied"
        );
        self.announce(&lifecycle_event(task)).await;
        Ok(())
    }

    async fn schedule_initial_reminder(&self, task: &Task) -> TaskLifecycleResult<Reminder> {
        let scheduled_at = self.policy.calculate_reminder_time(task, self.clock.utc());
        let reminder = Reminder::for_task(task, scheduled_at, ReminderKind::Initial);
        self.reminders.create(&reminder).await?;
        Ok(reminder)
    }

    /// Deletes every unsent reminder of a task, returning how many were
    /// removed.
    async fn cancel_pending_reminders(&self, task_id: TaskId) -> TaskLifecycleResult<usize> {
        let mut cancelled = 0;
        for reminder in self.reminders.list_by_task(task_id).await? {
            if !reminder.is_pending() {
                continue;
            }
            match self.reminders.delete(reminder.id()).await {
                Ok(()) => cancelled += 1,
                // Already removed by a concurrent cancellation.
                Err(ReminderRepositoryError::NotFound(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(cancelled)
    }

    async fn announce(&self, event: &NudgeEvent) {
        if let Err(err) = self.events.publish(event).await {
            tracing::warn!(
                event = event.name(),
                task_id = %event.task_id(),
                error = %err,
                "failed to publish task event"
            );
        }
    }
}

fn lifecycle_event(task: &Task) -> NudgeEvent {
    let task_id = task.id();
    let user_id = task.owner();
    match task.status() {
        TaskStatus::Active => NudgeEvent::TaskReactivated { task_id, user_id },
        TaskStatus::Completed => NudgeEvent::TaskCompleted { task_id, user_id },
        TaskStatus::Deleted => NudgeEvent::TaskDeleted { task_id, user_id },
        TaskStatus::Snoozed => NudgeEvent::TaskSnoozed {
            task_id,
            user_id,
            until: task.due_date().unwrap_or_else(|| task.updated_at()),
        },
    }
}

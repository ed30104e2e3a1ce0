//! Task aggregate root and its status state machine.

use super::{ChatId, TaskDomainError, TaskId, TaskPriority, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Input for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    owner: UserId,
    chat_id: Option<ChatId>,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: TaskPriority,
}

impl TaskDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub fn new(owner: UserId, title: impl Into<String>) -> Self {
        Self {
            owner,
            chat_id: None,
            title: title.into(),
            description: None,
            due_date: None,
            priority: TaskPriority::default(),
        }
    }

    /// Sets the chat context the task was created in.
    #[must_use]
    pub const fn with_chat(mut self, chat_id: ChatId) -> Self {
        self.chat_id = Some(chat_id);
        self
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Task aggregate root.
///
/// `completed_at` is set exactly when the status is
/// [`TaskStatus::Completed`]; every mutating method preserves this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    chat_id: Option<ChatId>,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: TaskPriority,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted chat context, if any.
    pub chat_id: Option<ChatId>,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            owner: draft.owner,
            chat_id: draft.chat_id,
            title: title.to_owned(),
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            status: TaskStatus::Active,
            created_at: timestamp,
            updated_at: timestamp,
            completed_at: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            chat_id: data.chat_id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            priority: data.priority,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the chat context the task was created in, if any.
    #[must_use]
    pub const fn chat_id(&self) -> Option<ChatId> {
        self.chat_id
    }

    /// Returns the chat reminders for this task are delivered into.
    ///
    /// Falls back to the owner's direct chat.
    #[must_use]
    pub fn reminder_chat(&self) -> ChatId {
        self.chat_id.unwrap_or_else(|| ChatId::direct(self.owner))
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Moves the task to `target`, applying that transition's side effects.
    ///
    /// Transitioning to the current status is a no-op. Snoozing needs a
    /// wake-up time and must go through [`Self::snooze`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] for transitions outside
    /// the table and [`TaskDomainError::Validation`] for a bare snooze. The
    /// task is left unmodified on error.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if target == self.status {
            return Ok(());
        }
        match target {
            TaskStatus::Active => self.reactivate(clock),
            TaskStatus::Completed => self.complete(clock),
            TaskStatus::Deleted => self.delete(clock),
            TaskStatus::Snoozed => Err(TaskDomainError::Validation(
                "snoozing requires a wake-up time".to_owned(),
            )),
        }
    }

    /// Marks the task completed and stamps `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] when already completed
    /// and [`TaskDomainError::InvalidTransition`] from a deleted task.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status == TaskStatus::Completed {
            return Err(TaskDomainError::AlreadyCompleted(self.id));
        }
        self.ensure_transition(TaskStatus::Completed)?;
        let now = clock.utc();
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Postpones the task by moving its due date to `until`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] from completed or
    /// deleted tasks and [`TaskDomainError::Validation`] when `until` is not
    /// in the future.
    pub fn snooze(
        &mut self,
        until: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Snoozed)?;
        let now = clock.utc();
        if until <= now {
            return Err(TaskDomainError::Validation(format!(
                "snooze time {until} must be in the future"
            )));
        }
        self.status = TaskStatus::Snoozed;
        self.due_date = Some(until);
        self.updated_at = now;
        Ok(())
    }

    /// Soft deletes the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyDeleted`] when already deleted.
    pub fn delete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status == TaskStatus::Deleted {
            return Err(TaskDomainError::AlreadyDeleted(self.id));
        }
        self.ensure_transition(TaskStatus::Deleted)?;
        self.status = TaskStatus::Deleted;
        self.completed_at = None;
        self.touch(clock);
        Ok(())
    }

    /// Returns the task to the active state, clearing `completed_at`.
    ///
    /// Reactivating an active task is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the table forbids
    /// the move.
    pub fn reactivate(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status == TaskStatus::Active {
            return Ok(());
        }
        self.ensure_transition(TaskStatus::Active)?;
        self.status = TaskStatus::Active;
        self.completed_at = None;
        self.touch(clock);
        Ok(())
    }

    fn ensure_transition(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidTransition {
            task_id: self.id,
            from: self.status,
            to: target,
        })
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

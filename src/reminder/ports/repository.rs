//! Repository port for reminders and per-user nudge settings.

use crate::reminder::domain::{NudgeSettings, Reminder, ReminderId};
use crate::task::domain::{TaskId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for reminder repository operations.
pub type ReminderRepositoryResult<T> = Result<T, ReminderRepositoryError>;

/// Durable store for reminders and nudge settings.
///
/// Implementations must make [`ReminderRepository::mark_sent`] a single
/// conditional write so concurrent workers cannot both claim a reminder.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Stores a new reminder.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderRepositoryError::DuplicateReminder`] when the ID
    /// already exists.
    async fn create(&self, reminder: &Reminder) -> ReminderRepositoryResult<()>;

    /// Returns unsent reminders scheduled at or before `now`, oldest first.
    async fn find_due(&self, now: DateTime<Utc>) -> ReminderRepositoryResult<Vec<Reminder>>;

    /// Sets `sent_at` on the reminder if it is still unsent.
    ///
    /// Returns `false` when the reminder was already sent (or no longer
    /// exists); this is not an error.
    async fn mark_sent(
        &self,
        id: ReminderId,
        sent_at: DateTime<Utc>,
    ) -> ReminderRepositoryResult<bool>;

    /// Creates `nudge` only while its task holds fewer than `max_nudges`
    /// nudge reminders.
    ///
    /// The count and the insert are atomic per task, so concurrent callers
    /// never push a task past its budget. Returns `false` when the budget is
    /// already spent.
    async fn create_nudge_within_budget(
        &self,
        nudge: &Reminder,
        max_nudges: u32,
    ) -> ReminderRepositoryResult<bool>;

    /// Returns every reminder of a task, ordered by scheduled time.
    async fn list_by_task(&self, task_id: TaskId) -> ReminderRepositoryResult<Vec<Reminder>>;

    /// Deletes a reminder.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderRepositoryError::NotFound`] when the reminder does
    /// not exist.
    async fn delete(&self, id: ReminderId) -> ReminderRepositoryResult<()>;

    /// Finds a user's nudge settings.
    ///
    /// Returns `None` when the user has never stored settings.
    async fn find_settings(&self, user_id: UserId)
    -> ReminderRepositoryResult<Option<NudgeSettings>>;

    /// Inserts or replaces a user's nudge settings.
    async fn upsert_settings(&self, settings: &NudgeSettings) -> ReminderRepositoryResult<()>;

    /// Stores `settings` only if the user has none yet, and returns whatever
    /// is stored afterwards.
    ///
    /// Settings written concurrently by another caller win over `settings`.
    async fn create_settings_if_absent(
        &self,
        settings: &NudgeSettings,
    ) -> ReminderRepositoryResult<NudgeSettings>;
}

/// Errors returned by reminder repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReminderRepositoryError {
    /// A reminder with the same identifier already exists.
    #[error("duplicate reminder identifier: {0}")]
    DuplicateReminder(ReminderId),

    /// The reminder was not found.
    #[error("reminder not found: {0}")]
    NotFound(ReminderId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReminderRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

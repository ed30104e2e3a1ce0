//! Error types for the scheduler lifecycle and polling cycles.

use super::ConfigError;
use crate::reminder::{
    domain::ReminderId,
    ports::{EventSinkError, ReminderRepositoryError},
};
use crate::task::{
    domain::{TaskId, UserId},
    ports::TaskRepositoryError,
};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by scheduler construction and lifecycle calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The configuration was rejected at construction.
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// `start` was called while the scheduler is running.
    #[error("scheduler is already running")]
    AlreadyRunning,

    /// `stop` was called while the scheduler is not running.
    #[error("scheduler is not running")]
    NotRunning,

    /// Workers did not exit within the shutdown budget.
    #[error("workers did not stop within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Failures inside a polling cycle.
///
/// Per-reminder failures are isolated: they are logged and counted, and the
/// reminder stays due for the next cycle.
#[derive(Debug, Clone, Error)]
pub enum ProcessingError {
    /// Due reminders could not be fetched; the cycle did nothing.
    #[error("failed to fetch due reminders: {0}")]
    Fetch(#[source] ReminderRepositoryError),

    /// The reminder event could not be published.
    #[error("failed to deliver reminder {reminder_id}: {source}")]
    Delivery {
        /// Reminder left undelivered.
        reminder_id: ReminderId,
        /// Event sink failure.
        #[source]
        source: EventSinkError,
    },

    /// The reminder could not be marked sent.
    #[error("failed to mark reminder {reminder_id} sent: {source}")]
    MarkSent {
        /// Reminder left unsent.
        reminder_id: ReminderId,
        /// Repository failure.
        #[source]
        source: ReminderRepositoryError,
    },

    /// The reminder's task could not be loaded for nudge evaluation.
    #[error("failed to load task {task_id}: {source}")]
    TaskLookup {
        /// Task being evaluated.
        task_id: TaskId,
        /// Repository failure.
        #[source]
        source: TaskRepositoryError,
    },

    /// The owner's nudge settings could not be loaded or created.
    #[error("failed to load nudge settings for user {user_id}: {source}")]
    Settings {
        /// Settings owner.
        user_id: UserId,
        /// Repository failure.
        #[source]
        source: ReminderRepositoryError,
    },

    /// The follow-up nudge could not be counted or stored.
    #[error("failed to create nudge for task {task_id}: {source}")]
    NudgeCreation {
        /// Task being nudged.
        task_id: TaskId,
        /// Repository failure.
        #[source]
        source: ReminderRepositoryError,
    },
}

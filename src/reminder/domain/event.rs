//! Domain events announced to the event sink.

use super::{ReminderId, ReminderKind};
use crate::task::domain::{ChatId, TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event published when reminders fire or task lifecycle changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NudgeEvent {
    /// A reminder reached its scheduled time and should be shown to the user.
    ReminderDue {
        /// Delivered reminder.
        reminder_id: ReminderId,
        /// Task the reminder is about.
        task_id: TaskId,
        /// User to remind.
        user_id: UserId,
        /// Chat to deliver into.
        chat_id: ChatId,
        /// Whether this is the first reminder or a nudge.
        kind: ReminderKind,
    },
    /// A task was completed.
    TaskCompleted {
        /// Completed task.
        task_id: TaskId,
        /// Task owner.
        user_id: UserId,
    },
    /// A task was snoozed.
    TaskSnoozed {
        /// Snoozed task.
        task_id: TaskId,
        /// Task owner.
        user_id: UserId,
        /// New due date.
        until: DateTime<Utc>,
    },
    /// A task was soft deleted.
    TaskDeleted {
        /// Deleted task.
        task_id: TaskId,
        /// Task owner.
        user_id: UserId,
    },
    /// A completed, snoozed, or deleted task became active again.
    TaskReactivated {
        /// Reactivated task.
        task_id: TaskId,
        /// Task owner.
        user_id: UserId,
    },
}

impl NudgeEvent {
    /// Returns the event name used as the publish subject.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReminderDue { .. } => "reminder_due",
            Self::TaskCompleted { .. } => "task_completed",
            Self::TaskSnoozed { .. } => "task_snoozed",
            Self::TaskDeleted { .. } => "task_deleted",
            Self::TaskReactivated { .. } => "task_reactivated",
        }
    }

    /// Returns the task the event concerns.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        match self {
            Self::ReminderDue { task_id, .. }
            | Self::TaskCompleted { task_id, .. }
            | Self::TaskSnoozed { task_id, .. }
            | Self::TaskDeleted { task_id, .. }
            | Self::TaskReactivated { task_id, .. } => *task_id,
        }
    }
}

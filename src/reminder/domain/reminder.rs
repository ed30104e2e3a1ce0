//! Reminder records and their delivery state.

use super::ParseReminderKindError;
use crate::task::domain::{ChatId, Task, TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(Uuid);

impl ReminderId {
    /// Creates a new random reminder identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a reminder identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ReminderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a reminder exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// First reminder, created when the task is scheduled.
    Initial,
    /// Follow-up created after an earlier reminder went unactioned.
    Nudge,
}

impl ReminderKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Nudge => "nudge",
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReminderKind {
    type Error = ParseReminderKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "initial" => Ok(Self::Initial),
            "nudge" => Ok(Self::Nudge),
            _ => Err(ParseReminderKindError(value.to_owned())),
        }
    }
}

/// A scheduled notification about a task.
///
/// A reminder is pending while `sent_at` is `None`. Once assigned, `sent_at`
/// never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    id: ReminderId,
    task_id: TaskId,
    user_id: UserId,
    chat_id: ChatId,
    scheduled_at: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
    kind: ReminderKind,
}

/// Parameter object for reconstructing a persisted reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReminderData {
    /// Persisted reminder identifier.
    pub id: ReminderId,
    /// Owning task.
    pub task_id: TaskId,
    /// Owning user.
    pub user_id: UserId,
    /// Delivery chat.
    pub chat_id: ChatId,
    /// Scheduled delivery time.
    pub scheduled_at: DateTime<Utc>,
    /// Delivery time, if sent.
    pub sent_at: Option<DateTime<Utc>>,
    /// Reminder kind.
    pub kind: ReminderKind,
}

impl Reminder {
    /// Creates a pending reminder for `task` at `scheduled_at`.
    #[must_use]
    pub fn for_task(task: &Task, scheduled_at: DateTime<Utc>, kind: ReminderKind) -> Self {
        Self {
            id: ReminderId::new(),
            task_id: task.id(),
            user_id: task.owner(),
            chat_id: task.reminder_chat(),
            scheduled_at,
            sent_at: None,
            kind,
        }
    }

    /// Creates a pending nudge following `previous`.
    #[must_use]
    pub fn nudge_after(previous: &Self, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            id: ReminderId::new(),
            task_id: previous.task_id,
            user_id: previous.user_id,
            chat_id: previous.chat_id,
            scheduled_at,
            sent_at: None,
            kind: ReminderKind::Nudge,
        }
    }

    /// Reconstructs a reminder from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReminderData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            user_id: data.user_id,
            chat_id: data.chat_id,
            scheduled_at: data.scheduled_at,
            sent_at: data.sent_at,
            kind: data.kind,
        }
    }

    /// Returns the reminder identifier.
    #[must_use]
    pub const fn id(&self) -> ReminderId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the delivery chat.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Returns the scheduled delivery time.
    #[must_use]
    pub const fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    /// Returns the delivery time, if sent.
    #[must_use]
    pub const fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    /// Returns the reminder kind.
    #[must_use]
    pub const fn kind(&self) -> ReminderKind {
        self.kind
    }

    /// Returns whether the reminder has not been sent yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.sent_at.is_none()
    }

    /// Returns whether the reminder should be delivered at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && self.scheduled_at <= now
    }

    /// Records delivery at `sent_at` unless already sent.
    ///
    /// Returns `false` and leaves the reminder untouched when it was already
    /// sent.
    pub fn mark_sent(&mut self, sent_at: DateTime<Utc>) -> bool {
        if self.sent_at.is_some() {
            return false;
        }
        self.sent_at = Some(sent_at);
        true
    }
}

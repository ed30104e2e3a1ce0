//! Task status values and the transition table between them.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is pending and eligible for reminders and nudges.
    Active,
    /// Task is postponed until its (moved) due date.
    Snoozed,
    /// Task has been finished.
    Completed,
    /// Task has been soft deleted; the record is kept as a tombstone.
    Deleted,
}

impl TaskStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 4] = [Self::Active, Self::Snoozed, Self::Completed, Self::Deleted];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Snoozed => "snoozed",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }

    /// Returns whether moving from `self` to `target` is allowed.
    ///
    /// Self-transitions are always allowed and treated as no-ops by
    /// [`Task::transition_to`](super::Task::transition_to).
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Active | Self::Completed | Self::Snoozed | Self::Deleted)
                | (Self::Snoozed, Self::Snoozed | Self::Active | Self::Completed | Self::Deleted)
                | (Self::Completed, Self::Completed | Self::Deleted | Self::Active)
                | (Self::Deleted, Self::Deleted | Self::Active)
        )
    }

    /// Returns whether the task no longer needs reminders.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Deleted)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "snoozed" => Ok(Self::Snoozed),
            "completed" => Ok(Self::Completed),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

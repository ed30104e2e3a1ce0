//! Domain model for reminders, nudge settings, and reminder events.

mod event;
mod reminder;
mod settings;

pub use event::NudgeEvent;
pub use reminder::{PersistedReminderData, Reminder, ReminderId, ReminderKind};
pub use settings::{
    DEFAULT_MAX_NUDGES, DEFAULT_NUDGE_INTERVAL_SECS, MIN_NUDGE_INTERVAL_SECS, NudgeSettings,
    PersistedNudgeSettingsData, min_nudge_interval,
};

use thiserror::Error;

/// Error returned while parsing reminder kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown reminder kind: {0}")]
pub struct ParseReminderKindError(pub String);

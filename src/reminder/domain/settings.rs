//! Per-user nudge configuration.

use crate::task::domain::UserId;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

/// Shortest nudge interval a user can configure, in seconds.
pub const MIN_NUDGE_INTERVAL_SECS: i64 = 15 * 60;

/// Nudge interval applied when no other default is configured, in seconds.
pub const DEFAULT_NUDGE_INTERVAL_SECS: i64 = 60 * 60;

/// Follow-up nudges allowed per task by default.
pub const DEFAULT_MAX_NUDGES: u32 = 3;

/// Per-user nudge configuration.
///
/// One record per user, created lazily with defaults on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NudgeSettings {
    user_id: UserId,
    nudge_interval: TimeDelta,
    max_nudges: u32,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing persisted settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNudgeSettingsData {
    /// Owning user.
    pub user_id: UserId,
    /// Configured nudge interval.
    pub nudge_interval: TimeDelta,
    /// Maximum nudges per task.
    pub max_nudges: u32,
    /// Whether nudging is enabled.
    pub enabled: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Returns the minimum nudge interval.
#[must_use]
pub fn min_nudge_interval() -> TimeDelta {
    TimeDelta::seconds(MIN_NUDGE_INTERVAL_SECS)
}

impl NudgeSettings {
    /// Creates settings for `user_id`; intervals shorter than 15 minutes are
    /// raised to 15 minutes.
    #[must_use]
    pub fn new(
        user_id: UserId,
        nudge_interval: TimeDelta,
        max_nudges: u32,
        enabled: bool,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            user_id,
            nudge_interval: nudge_interval.max(min_nudge_interval()),
            max_nudges,
            enabled,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates enabled settings with the default nudge count and the given
    /// interval.
    #[must_use]
    pub fn defaults(user_id: UserId, nudge_interval: TimeDelta, clock: &impl Clock) -> Self {
        Self::new(user_id, nudge_interval, DEFAULT_MAX_NUDGES, true, clock)
    }

    /// Reconstructs settings from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNudgeSettingsData) -> Self {
        Self {
            user_id: data.user_id,
            nudge_interval: data.nudge_interval.max(min_nudge_interval()),
            max_nudges: data.max_nudges,
            enabled: data.enabled,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the nudge interval, never below 15 minutes.
    #[must_use]
    pub const fn nudge_interval(&self) -> TimeDelta {
        self.nudge_interval
    }

    /// Returns the maximum number of nudges per task.
    #[must_use]
    pub const fn max_nudges(&self) -> u32 {
        self.max_nudges
    }

    /// Returns whether nudging is enabled.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
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

    /// Replaces the user-editable values, keeping the creation timestamp.
    pub fn update(
        &mut self,
        nudge_interval: TimeDelta,
        max_nudges: u32,
        enabled: bool,
        clock: &impl Clock,
    ) {
        self.nudge_interval = nudge_interval.max(min_nudge_interval());
        self.max_nudges = max_nudges;
        self.enabled = enabled;
        self.updated_at = clock.utc();
    }
}

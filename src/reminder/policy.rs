//! Nudge escalation policy.
//!
//! Pure decision functions: when a task's first reminder fires, whether an
//! unactioned reminder earns a follow-up nudge, and when that nudge fires.
//! Callers pass the current instant explicitly so the policy performs no I/O
//! and reads no clock.

use super::domain::NudgeSettings;
use crate::task::domain::{Task, TaskPriority, TaskStatus};
use chrono::{DateTime, TimeDelta, Utc};

/// Delay applied to tasks without a due date, in seconds.
const UNDATED_REMINDER_DELAY_SECS: i64 = 5 * 60;

/// Delay applied when the computed reminder time is already in the past.
const OVERDUE_REMINDER_DELAY_SECS: i64 = 60;

/// Lead time for urgent tasks, in seconds.
const URGENT_LEAD_SECS: i64 = 2 * 60 * 60;

/// Lead time for high-priority tasks, in seconds.
const HIGH_LEAD_SECS: i64 = 4 * 60 * 60;

/// Lead time for low-priority tasks, in seconds.
const LOW_LEAD_SECS: i64 = 30 * 60;

/// Default lead time for medium-priority tasks, in seconds.
pub const DEFAULT_LEAD_SECS: i64 = 60 * 60;

/// Upper bound on the gap between consecutive nudges, in seconds.
pub const MAX_NUDGE_INTERVAL_SECS: i64 = 24 * 60 * 60;

/// Factor applied to the configured interval between nudges.
pub const BACKOFF_MULTIPLIER: i32 = 2;

/// Reminder timing and escalation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NudgePolicy {
    default_lead_time: TimeDelta,
    max_nudge_interval: TimeDelta,
}

impl Default for NudgePolicy {
    fn default() -> Self {
        Self {
            default_lead_time: TimeDelta::seconds(DEFAULT_LEAD_SECS),
            max_nudge_interval: TimeDelta::seconds(MAX_NUDGE_INTERVAL_SECS),
        }
    }
}

impl NudgePolicy {
    /// Creates a policy with the standard lead times and a 24 hour cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the lead time used for medium-priority tasks.
    #[must_use]
    pub const fn with_default_lead_time(mut self, lead_time: TimeDelta) -> Self {
        self.default_lead_time = lead_time;
        self
    }

    /// Returns how long before the due date a task of `priority` is
    /// reminded.
    #[must_use]
    pub fn lead_time(&self, priority: TaskPriority) -> TimeDelta {
        match priority {
            TaskPriority::Urgent => TimeDelta::seconds(URGENT_LEAD_SECS),
            TaskPriority::High => TimeDelta::seconds(HIGH_LEAD_SECS),
            TaskPriority::Medium => self.default_lead_time,
            TaskPriority::Low => TimeDelta::seconds(LOW_LEAD_SECS),
        }
    }

    /// Computes when the initial reminder for `task` should fire.
    ///
    /// Undated tasks are reminded five minutes from `now`. A reminder time
    /// that has already passed is moved to one minute from `now` so it is
    /// never skipped.
    #[must_use]
    pub fn calculate_reminder_time(&self, task: &Task, now: DateTime<Utc>) -> DateTime<Utc> {
        let Some(due_date) = task.due_date() else {
            return now + TimeDelta::seconds(UNDATED_REMINDER_DELAY_SECS);
        };
        let reminder_time = due_date - self.lead_time(task.priority());
        if reminder_time < now {
            return now + TimeDelta::seconds(OVERDUE_REMINDER_DELAY_SECS);
        }
        reminder_time
    }

    /// Decides whether `task` should receive another nudge.
    ///
    /// Only enabled, active, dated tasks below their nudge budget qualify,
    /// and only once they are overdue or due within one nudge interval.
    #[must_use]
    pub fn should_create_nudge(
        &self,
        task: &Task,
        existing_nudge_count: u32,
        settings: &NudgeSettings,
        now: DateTime<Utc>,
    ) -> bool {
        if !settings.enabled() || existing_nudge_count >= settings.max_nudges() {
            return false;
        }
        if task.status() != TaskStatus::Active {
            return false;
        }
        task.due_date()
            .is_some_and(|due_date| due_date - now <= settings.nudge_interval())
    }

    /// Computes when the nudge following a reminder scheduled at
    /// `last_scheduled_at` fires.
    ///
    /// The gap is the configured interval doubled, capped at 24 hours.
    #[must_use]
    pub fn next_nudge_time(
        &self,
        last_scheduled_at: DateTime<Utc>,
        settings: &NudgeSettings,
    ) -> DateTime<Utc> {
        let interval =
            (settings.nudge_interval() * BACKOFF_MULTIPLIER).min(self.max_nudge_interval);
        last_scheduled_at + interval
    }
}

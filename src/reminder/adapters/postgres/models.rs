//! Diesel row models for reminder persistence.

use super::schema::{nudge_settings, reminders};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for reminder records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reminders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReminderRow {
    /// Reminder identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Owning user.
    pub user_id: i64,
    /// Delivery chat.
    pub chat_id: i64,
    /// Scheduled delivery time.
    pub scheduled_at: DateTime<Utc>,
    /// Delivery time.
    pub sent_at: Option<DateTime<Utc>>,
    /// Kind in canonical string form.
    pub kind: String,
}

/// Row model for nudge settings records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = nudge_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NudgeSettingsRow {
    /// Owning user.
    pub user_id: i64,
    /// Nudge interval in seconds.
    pub nudge_interval_secs: i64,
    /// Maximum nudges per task.
    pub max_nudges: i32,
    /// Whether nudging is enabled.
    pub enabled: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

//! Diesel schema for reminder and nudge settings persistence.

diesel::table! {
    /// Scheduled reminders; `sent_at` is NULL while pending.
    reminders (id) {
        /// Reminder identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Owning user.
        user_id -> Int8,
        /// Delivery chat.
        chat_id -> Int8,
        /// Scheduled delivery time.
        scheduled_at -> Timestamptz,
        /// Delivery time, assigned once.
        sent_at -> Nullable<Timestamptz>,
        /// Reminder kind.
        #[max_length = 20]
        kind -> Varchar,
    }
}

diesel::table! {
    /// Per-user nudge configuration.
    nudge_settings (user_id) {
        /// Owning user.
        user_id -> Int8,
        /// Nudge interval in seconds.
        nudge_interval_secs -> Int8,
        /// Maximum nudges per task.
        max_nudges -> Int4,
        /// Whether nudging is enabled.
        enabled -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

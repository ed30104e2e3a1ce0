//! Diesel schema for task persistence.

diesel::table! {
    /// Task records; deleted tasks remain as tombstones.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Int8,
        /// Chat context the task was created in.
        chat_id -> Nullable<Int8>,
        /// Task title.
        #[max_length = 500]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Task priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Task status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Completion timestamp, set only while completed.
        completed_at -> Nullable<Timestamptz>,
    }
}

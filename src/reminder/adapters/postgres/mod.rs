//! `PostgreSQL` adapters for reminder and nudge settings persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresReminderRepository;

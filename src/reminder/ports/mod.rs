//! Port contracts for reminder persistence and event publication.

pub mod event_sink;
pub mod repository;

pub use event_sink::{EventSinkError, ReminderEventSink};
pub use repository::{ReminderRepository, ReminderRepositoryError, ReminderRepositoryResult};

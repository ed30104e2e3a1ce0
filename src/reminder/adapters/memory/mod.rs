//! In-memory adapters for reminder persistence and event publication.

mod event_sink;
mod reminder;

pub use event_sink::RecordingEventSink;
pub use reminder::InMemoryReminderRepository;

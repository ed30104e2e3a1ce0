//! Recording event sink for tests and local runs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::reminder::{
    domain::NudgeEvent,
    ports::{EventSinkError, ReminderEventSink},
};

/// Event sink that keeps every published event in memory.
///
/// [`RecordingEventSink::set_failing`] makes subsequent publishes fail, which
/// leaves due reminders unsent for the next polling cycle.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<NudgeEvent>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingEventSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<NudgeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Switches publish failures on or off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReminderEventSink for RecordingEventSink {
    async fn publish(&self, event: &NudgeEvent) -> Result<(), EventSinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventSinkError::Rejected {
                event: event.name(),
                reason: "recording sink set to fail".to_owned(),
            });
        }
        let mut events = self.events.lock().map_err(|err| {
            EventSinkError::transport(std::io::Error::other(err.to_string()))
        })?;
        events.push(event.clone());
        Ok(())
    }
}

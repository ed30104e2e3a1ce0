//! In-process publish/subscribe event sink.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::reminder::{
    domain::NudgeEvent,
    ports::{EventSinkError, ReminderEventSink},
};

/// Default number of events buffered per subscriber.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// Event sink fanning events out to every subscriber.
///
/// Publishing while nobody is subscribed succeeds; the event is dropped.
/// Subscribers that fall more than the channel capacity behind miss events.
#[derive(Debug, Clone)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<NudgeEvent>,
}

impl BroadcastEventSink {
    /// Creates a sink buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a new subscription receiving events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NudgeEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_CAPACITY)
    }
}

#[async_trait]
impl ReminderEventSink for BroadcastEventSink {
    async fn publish(&self, event: &NudgeEvent) -> Result<(), EventSinkError> {
        match self.sender.send(event.clone()) {
            Ok(receivers) => {
                tracing::trace!(event = event.name(), receivers, "event broadcast");
            }
            Err(_) => {
                tracing::trace!(event = event.name(), "event broadcast without subscribers");
            }
        }
        Ok(())
    }
}

//! Outbound port for announcing reminder and task events.

use crate::reminder::domain::NudgeEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Destination for domain events (chat delivery, nudge counting, and so on).
///
/// Delivery is at least once: a `ReminderDue` event may arrive twice for one
/// reminder, so consumers deduplicate on its `reminder_id`.
#[async_trait]
pub trait ReminderEventSink: Send + Sync {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError`] when the event could not be handed to the
    /// transport. Callers treat the event as undelivered.
    async fn publish(&self, event: &NudgeEvent) -> Result<(), EventSinkError>;
}

/// Errors returned by event sink implementations.
#[derive(Debug, Clone, Error)]
pub enum EventSinkError {
    /// The sink no longer accepts events.
    #[error("event sink is closed")]
    Closed,

    /// The transport rejected the event.
    #[error("event {event} rejected: {reason}")]
    Rejected {
        /// Name of the rejected event.
        event: &'static str,
        /// Transport-provided reason.
        reason: String,
    },

    /// Transport-layer failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventSinkError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

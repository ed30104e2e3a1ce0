//! Nudge: reminder scheduling and nudge escalation for chat-based task
//! tracking.
//!
//! Users create tasks in a chat. Dated tasks get an initial reminder ahead of
//! their due date; reminders that go unactioned are followed by nudges at
//! growing intervals, bounded per user.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and delivery
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//!
//! # Modules
//!
//! - [`task`]: Task records and the status state machine
//! - [`reminder`]: Reminders, nudge settings, and the escalation policy
//! - [`scheduler`]: Background workers that deliver due reminders

pub mod reminder;
pub mod scheduler;
pub mod task;

#[cfg(test)]
mod test_support;

//! Background reminder scheduler.
//!
//! A fixed pool of workers polls the reminder store, delivers due reminders
//! to the event sink, and escalates unactioned tasks with nudges:
//!
//! - Options and validation in [`config`]
//! - Lifecycle and cycle errors in [`error`]
//! - Shared counters in [`metrics`]
//! - The polling cycle in [`worker`]
//! - Pool start and stop in [`service`]

pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod worker;

pub use config::{ConfigError, MIN_NUDGE_DELAY, SchedulerConfig};
pub use error::{ProcessingError, SchedulerError};
pub use metrics::{MetricsSnapshot, SchedulerMetrics};
pub use service::ReminderScheduler;
pub use worker::{CycleReport, ReminderWorker, SchedulerPorts};

#[cfg(test)]
mod tests;

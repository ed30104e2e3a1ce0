//! Task records and their status state machine.
//!
//! Tasks move between `active`, `snoozed`, `completed`, and `deleted` under
//! the rules in [`domain::TaskStatus`]. The lifecycle service keeps each
//! task's reminders in step with its status. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

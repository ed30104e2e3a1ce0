//! Reminders, nudge settings, and nudge escalation policy.
//!
//! Reminders are created when a task is scheduled (`initial`) or when an
//! earlier reminder goes unactioned (`nudge`). The module follows the same
//! hexagonal split as [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Pure timing rules in [`policy`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Shared services in [`services`]

pub mod adapters;
pub mod domain;
pub mod policy;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

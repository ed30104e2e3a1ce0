//! Step definitions for nudge escalation scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;

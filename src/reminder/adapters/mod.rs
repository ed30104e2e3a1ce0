//! Adapter implementations of the reminder ports.

pub mod broadcast;
pub mod memory;
pub mod postgres;

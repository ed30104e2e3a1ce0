//! Unit tests for the reminder module.

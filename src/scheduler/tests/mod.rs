//! Unit tests for the scheduler module.

mod support;

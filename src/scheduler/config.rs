//! Scheduler configuration and its validation rules.

use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

/// Shortest accepted fallback nudge interval.
pub const MIN_NUDGE_DELAY: Duration = Duration::from_secs(60);

/// Options recognised by the reminder scheduler.
///
/// Durations deserialize from whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Period between polling cycles of each worker.
    #[serde(rename = "poll_interval_secs", deserialize_with = "duration_from_secs")]
    pub poll_interval: Duration,
    /// Number of concurrent workers.
    pub worker_count: usize,
    /// Nudge interval used for users without stored settings.
    #[serde(rename = "nudge_delay_secs", deserialize_with = "duration_from_secs")]
    pub nudge_delay: Duration,
    /// Time `stop` waits for workers to exit.
    #[serde(rename = "shutdown_timeout_secs", deserialize_with = "duration_from_secs")]
    pub shutdown_timeout: Duration,
    /// Whether the host process starts the scheduler at all.
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            worker_count: 3,
            nudge_delay: Duration::from_secs(60 * 60),
            shutdown_timeout: Duration::from_secs(30),
            enabled: true,
        }
    }
}

impl SchedulerConfig {
    /// Checks every option against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.worker_count == 0 {
            return Err(ConfigError::ZeroWorkerCount);
        }
        if self.nudge_delay < MIN_NUDGE_DELAY {
            return Err(ConfigError::NudgeDelayTooShort(self.nudge_delay));
        }
        if chrono::TimeDelta::from_std(self.nudge_delay).is_err() {
            return Err(ConfigError::NudgeDelayOutOfRange(self.nudge_delay));
        }
        if self.shutdown_timeout.is_zero() {
            return Err(ConfigError::ZeroShutdownTimeout);
        }
        Ok(())
    }
}

/// Invalid scheduler configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The poll interval is zero.
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    /// The worker count is zero.
    #[error("worker count must be greater than zero")]
    ZeroWorkerCount,

    /// The nudge delay is below one minute.
    #[error("nudge delay must be at least 60s, got {0:?}")]
    NudgeDelayTooShort(Duration),

    /// The nudge delay cannot be represented as a calendar duration.
    #[error("nudge delay {0:?} is out of range")]
    NudgeDelayOutOfRange(Duration),

    /// The shutdown timeout is zero.
    #[error("shutdown timeout must be greater than zero")]
    ZeroShutdownTimeout,
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

//! Process-lifetime scheduler counters.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Counters shared by every worker of one scheduler.
///
/// Counters only grow. Each field is individually consistent; a snapshot is
/// not a transaction across fields.
#[derive(Debug)]
pub struct SchedulerMetrics {
    reminders_processed: AtomicU64,
    nudges_created: AtomicU64,
    processing_errors: AtomicU64,
    timing: Mutex<CycleTiming>,
    generation: AtomicU64,
    /// Generation owning each worker slot; zero while the slot is idle.
    workers: Vec<AtomicU64>,
}

#[derive(Debug, Default)]
struct CycleTiming {
    total: Duration,
    cycles: u32,
    last_processed_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of [`SchedulerMetrics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Reminders this process marked sent.
    pub reminders_processed: u64,
    /// Nudge reminders created.
    pub nudges_created: u64,
    /// Fetch, delivery, nudge, and worker failures.
    pub processing_errors: u64,
    /// Mean duration of cycles that found due reminders.
    pub average_processing_time: Duration,
    /// End of the latest cycle that found due reminders.
    pub last_processed_at: Option<DateTime<Utc>>,
    /// Whether each worker is currently running.
    pub active_workers: Vec<bool>,
}

impl MetricsSnapshot {
    /// Returns how many workers are running.
    #[must_use]
    pub fn active_worker_count(&self) -> usize {
        self.active_workers.iter().filter(|active| **active).count()
    }
}

impl SchedulerMetrics {
    /// Creates zeroed metrics tracking `worker_count` workers.
    #[must_use]
    pub fn new(worker_count: usize) -> Self {
        Self {
            reminders_processed: AtomicU64::new(0),
            nudges_created: AtomicU64::new(0),
            processing_errors: AtomicU64::new(0),
            timing: Mutex::new(CycleTiming::default()),
            generation: AtomicU64::new(0),
            workers: (0..worker_count).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Adds delivered reminders.
    pub fn record_processed(&self, count: u64) {
        self.reminders_processed.fetch_add(count, Ordering::Relaxed);
    }

    /// Adds created nudges.
    pub fn record_nudges(&self, count: u64) {
        self.nudges_created.fetch_add(count, Ordering::Relaxed);
    }

    /// Adds processing errors.
    pub fn record_errors(&self, count: u64) {
        self.processing_errors.fetch_add(count, Ordering::Relaxed);
    }

    /// Folds one cycle's duration into the running average.
    pub fn record_cycle(&self, duration: Duration, finished_at: DateTime<Utc>) {
        let mut timing = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
        timing.total = timing.total.saturating_add(duration);
        timing.cycles = timing.cycles.saturating_add(1);
        timing.last_processed_at = Some(finished_at);
    }

    /// Opens a new worker generation and returns its number.
    ///
    /// Workers of older generations can no longer change activity flags, so
    /// a worker detached by a timed-out stop cannot clear the flag of its
    /// replacement.
    pub fn begin_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }

    /// Flags worker `index` of `generation` as running or stopped.
    ///
    /// Indices outside the pool are ignored. Marking a worker running only
    /// takes effect for the current generation; marking it stopped only
    /// clears a slot that generation still owns.
    pub fn set_worker_active(&self, index: usize, generation: u64, active: bool) {
        let Some(slot) = self.workers.get(index) else {
            return;
        };
        if active {
            if self.generation.load(Ordering::SeqCst) == generation {
                slot.store(generation, Ordering::SeqCst);
            }
        } else {
            // Fails harmlessly when a newer generation owns the slot.
            let _previous =
                slot.compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst);
        }
    }

    /// Returns a copy of the current values.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let (average_processing_time, last_processed_at) = {
            let timing = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
            (
                timing.total.checked_div(timing.cycles).unwrap_or_default(),
                timing.last_processed_at,
            )
        };
        MetricsSnapshot {
            reminders_processed: self.reminders_processed.load(Ordering::Relaxed),
            nudges_created: self.nudges_created.load(Ordering::Relaxed),
            processing_errors: self.processing_errors.load(Ordering::Relaxed),
            average_processing_time,
            last_processed_at,
            active_workers: self
                .workers
                .iter()
                .map(|slot| slot.load(Ordering::SeqCst) != 0)
                .collect(),
        }
    }
}

//! Worker pool lifecycle: start, stop, and status.

use super::{
    ConfigError, ReminderWorker, SchedulerConfig, SchedulerError, SchedulerMetrics, SchedulerPorts,
};
use chrono::TimeDelta;
use mockable::Clock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Runs a fixed pool of reminder workers on a polling interval.
///
/// Each worker owns an independent timer whose first tick fires one poll
/// interval after `start`. Cycles that outlast the interval delay the next
/// tick rather than bursting to catch up.
pub struct ReminderScheduler<C>
where
    C: Clock + Send + Sync + 'static,
{
    config: SchedulerConfig,
    worker: Arc<ReminderWorker<C>>,
    metrics: Arc<SchedulerMetrics>,
    running: AtomicBool,
    pool: Mutex<Option<WorkerPool>>,
}

struct WorkerPool {
    cancel: CancellationToken,
    handles: JoinSet<()>,
}

impl<C> ReminderScheduler<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Validates `config` and prepares an idle scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfiguration`] when any option is
    /// out of range.
    pub fn new(
        config: SchedulerConfig,
        ports: SchedulerPorts,
        clock: Arc<C>,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;
        let nudge_delay = TimeDelta::from_std(config.nudge_delay)
            .map_err(|_| ConfigError::NudgeDelayOutOfRange(config.nudge_delay))?;
        let metrics = Arc::new(SchedulerMetrics::new(config.worker_count));
        let worker = ReminderWorker::new(ports, clock, Arc::clone(&metrics))
            .with_default_nudge_interval(nudge_delay);
        Ok(Self {
            config,
            worker: Arc::new(worker),
            metrics,
            running: AtomicBool::new(false),
            pool: Mutex::new(None),
        })
    }

    /// Returns the validated configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the shared metrics.
    #[must_use]
    pub fn metrics(&self) -> Arc<SchedulerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Returns the worker that executes polling cycles.
    #[must_use]
    pub fn worker(&self) -> &ReminderWorker<C> {
        &self.worker
    }

    /// Reports whether the pool was started and not yet stopped.
    ///
    /// Cancelling the token passed to [`Self::start`] halts the workers but
    /// leaves this flag set until [`Self::stop`] is called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawns the configured number of workers.
    ///
    /// Workers stop when `shutdown` or the scheduler's own stop signal is
    /// cancelled. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::AlreadyRunning`] when the pool is active.
    pub fn start(&self, shutdown: &CancellationToken) -> Result<(), SchedulerError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SchedulerError::AlreadyRunning);
        }

        let cancel = shutdown.child_token();
        let generation = self.metrics.begin_generation();
        let mut handles = JoinSet::new();
        for index in 0..self.config.worker_count {
            handles.spawn(run_worker(
                index,
                generation,
                Arc::clone(&self.worker),
                cancel.clone(),
                self.config.poll_interval,
            ));
        }
        *self.pool.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(WorkerPool { cancel, handles });

        tracing::info!(
            workers = self.config.worker_count,
            poll_interval = ?self.config.poll_interval,
            "reminder scheduler started"
        );
        Ok(())
    }

    /// Signals every worker to stop and waits up to the shutdown timeout.
    ///
    /// The scheduler is marked stopped even when the wait times out; workers
    /// still running at that point are left to finish their current cycle.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NotRunning`] when the pool is idle, or
    /// [`SchedulerError::ShutdownTimeout`] when workers outlive the timeout.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        let pool = self
            .pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(WorkerPool { cancel, mut handles }) = pool else {
            return Err(SchedulerError::NotRunning);
        };

        cancel.cancel();
        let timeout = self.config.shutdown_timeout;
        let drained = tokio::time::timeout(timeout, async {
            while handles.join_next().await.is_some() {}
        })
        .await;
        self.running.store(false, Ordering::SeqCst);

        if drained.is_err() {
            tracing::error!(
                timeout = ?timeout,
                remaining = handles.len(),
                "reminder workers did not stop in time"
            );
            handles.detach_all();
            return Err(SchedulerError::ShutdownTimeout(timeout));
        }
        tracing::info!("reminder scheduler stopped");
        Ok(())
    }
}

async fn run_worker<C>(
    index: usize,
    generation: u64,
    worker: Arc<ReminderWorker<C>>,
    cancel: CancellationToken,
    poll_interval: Duration,
) where
    C: Clock + Send + Sync + 'static,
{
    let metrics = Arc::clone(worker.metrics());
    metrics.set_worker_active(index, generation, true);
    tracing::info!(worker = index, "reminder worker started");

    let mut ticker = tokio::time::interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::info!(worker = index, "reminder worker stopping");
                break;
            }
            _ = ticker.tick() => {
                let cycle_worker = Arc::clone(&worker);
                let cycle = tokio::spawn(async move { cycle_worker.process_reminders().await });
                match cycle.await {
                    Ok(Ok(_)) => {}
                    Ok(Err(err)) => {
                        tracing::warn!(worker = index, error = %err, "reminder cycle failed");
                    }
                    Err(err) => {
                        // A faulted worker is not restarted.
                        metrics.record_errors(1);
                        tracing::error!(worker = index, error = %err, "reminder worker faulted");
                        break;
                    }
                }
            }
        }
    }

    metrics.set_worker_active(index, generation, false);
}

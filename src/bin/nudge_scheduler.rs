//! Runs the reminder scheduler against a `PostgreSQL` database.
//!
//! Usage:
//!
//! ```text
//! nudge-scheduler --database-url postgres://localhost/nudge --workers 3
//! ```
//!
//! Every option may also be supplied through its `NUDGE_*` environment
//! variable. Delivered events are logged as JSON until the process receives
//! Ctrl-C, at which point the scheduler is stopped within the configured
//! shutdown timeout.

use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::WrapErr;
use mockable::DefaultClock;
use nudge::reminder::adapters::{
    broadcast::BroadcastEventSink, postgres::PostgresReminderRepository,
};
use nudge::reminder::ports::ReminderEventSink;
use nudge::scheduler::{ReminderScheduler, SchedulerConfig, SchedulerError, SchedulerPorts};
use nudge::task::adapters::postgres::{NudgePgPool, PostgresTaskRepository};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Command-line options for the scheduler process.
#[derive(Debug, Parser)]
#[command(name = "nudge-scheduler", about = "Delivers due reminders and escalates nudges")]
struct Args {
    /// `PostgreSQL` connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Seconds between polling cycles of each worker.
    #[arg(long, env = "NUDGE_POLL_INTERVAL_SECS", default_value_t = 30)]
    poll_interval_secs: u64,

    /// Number of concurrent reminder workers.
    #[arg(long, env = "NUDGE_WORKERS", default_value_t = 3)]
    workers: usize,

    /// Default nudge interval in seconds for users without settings.
    #[arg(long, env = "NUDGE_DELAY_SECS", default_value_t = 3600)]
    nudge_delay_secs: u64,

    /// Seconds to wait for workers to finish on shutdown.
    #[arg(long, env = "NUDGE_SHUTDOWN_TIMEOUT_SECS", default_value_t = 30)]
    shutdown_timeout_secs: u64,

    /// Whether the scheduler runs at all.
    #[arg(long, env = "NUDGE_ENABLED", default_value_t = true, action = ArgAction::Set)]
    enabled: bool,
}

impl Args {
    const fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            worker_count: self.workers,
            nudge_delay: Duration::from_secs(self.nudge_delay_secs),
            shutdown_timeout: Duration::from_secs(self.shutdown_timeout_secs),
            enabled: self.enabled,
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.scheduler_config();
    if !config.enabled {
        tracing::info!("reminder scheduler disabled; exiting");
        return Ok(());
    }

    let pool = connect(&args.database_url)?;
    let events = Arc::new(BroadcastEventSink::default());
    let sink: Arc<dyn ReminderEventSink> = events.clone();
    let ports = SchedulerPorts::new(
        Arc::new(PostgresTaskRepository::new(pool.clone())),
        Arc::new(PostgresReminderRepository::new(pool)),
        sink,
    );
    let scheduler = ReminderScheduler::new(config, ports, Arc::new(DefaultClock))
        .wrap_err("invalid scheduler configuration")?;

    let shutdown = CancellationToken::new();
    let logger = tokio::spawn(log_events(events, shutdown.child_token()));
    scheduler.start(&shutdown)?;

    tokio::signal::ctrl_c()
        .await
        .wrap_err("failed to listen for shutdown signal")?;
    tracing::info!("shutdown requested");

    let stopped = scheduler.stop().await;
    shutdown.cancel();
    if let Err(err) = logger.await {
        tracing::warn!(error = %err, "event logger terminated abnormally");
    }

    let metrics = scheduler.metrics().snapshot();
    tracing::info!(
        metrics = %serde_json::to_string(&metrics).wrap_err("serialise metrics")?,
        "scheduler stopped"
    );
    match stopped {
        Ok(()) => Ok(()),
        Err(SchedulerError::ShutdownTimeout(timeout)) => {
            tracing::warn!(?timeout, "workers did not finish before the shutdown timeout");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn connect(database_url: &str) -> eyre::Result<NudgePgPool> {
    Pool::builder()
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .wrap_err("failed to build PostgreSQL connection pool")
}

async fn log_events(events: Arc<BroadcastEventSink>, cancel: CancellationToken) {
    let mut receiver = events.subscribe();
    loop {
        let received = tokio::select! {
            () = cancel.cancelled() => break,
            received = receiver.recv() => received,
        };
        match received {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => tracing::info!(event = event.name(), payload = %json, "event"),
                Err(err) => tracing::warn!(error = %err, "failed to serialise event"),
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event logger fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

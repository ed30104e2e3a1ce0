//! One polling cycle: deliver due reminders and escalate unactioned tasks.

use super::{ProcessingError, SchedulerMetrics};
use crate::reminder::{
    domain::{DEFAULT_NUDGE_INTERVAL_SECS, NudgeEvent, Reminder, ReminderKind},
    policy::NudgePolicy,
    ports::{ReminderEventSink, ReminderRepository},
    services::get_or_create_settings,
};
use crate::task::ports::TaskRepository;
use chrono::TimeDelta;
use mockable::Clock;
use std::sync::Arc;
use std::time::Instant;

/// Persistence and delivery ports shared by every worker.
#[derive(Clone)]
pub struct SchedulerPorts {
    /// Task lookups for nudge evaluation.
    pub tasks: Arc<dyn TaskRepository>,
    /// Reminder and nudge settings persistence.
    pub reminders: Arc<dyn ReminderRepository>,
    /// Destination for reminder events.
    pub events: Arc<dyn ReminderEventSink>,
}

impl SchedulerPorts {
    /// Bundles the three ports.
    #[must_use]
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        reminders: Arc<dyn ReminderRepository>,
        events: Arc<dyn ReminderEventSink>,
    ) -> Self {
        Self {
            tasks,
            reminders,
            events,
        }
    }
}

/// Outcome of one polling cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Reminders returned by the due query.
    pub due: usize,
    /// Reminders this cycle marked sent.
    pub delivered: usize,
    /// Reminders another worker marked sent first.
    pub already_delivered: usize,
    /// Nudges created after delivery.
    pub nudges_created: usize,
    /// Per-reminder failures; the affected reminders stay due.
    pub errors: Vec<ProcessingError>,
}

/// Executes polling cycles against the shared ports.
///
/// Several workers may run cycles concurrently over the same store. The
/// conditional `mark_sent` decides which of them owns each reminder, so only
/// the winner counts the delivery and evaluates a nudge.
///
/// `ReminderDue` is published before the claim, so two workers racing over
/// one reminder may both publish it while only one marks it sent. Sink
/// consumers should deduplicate on `reminder_id`.
pub struct ReminderWorker<C>
where
    C: Clock + Send + Sync,
{
    ports: SchedulerPorts,
    clock: Arc<C>,
    metrics: Arc<SchedulerMetrics>,
    policy: NudgePolicy,
    default_nudge_interval: TimeDelta,
}

impl<C> ReminderWorker<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a worker with the standard nudge policy.
    #[must_use]
    pub fn new(ports: SchedulerPorts, clock: Arc<C>, metrics: Arc<SchedulerMetrics>) -> Self {
        Self {
            ports,
            clock,
            metrics,
            policy: NudgePolicy::default(),
            default_nudge_interval: TimeDelta::seconds(DEFAULT_NUDGE_INTERVAL_SECS),
        }
    }

    /// Replaces the nudge policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: NudgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the interval used when a user has no stored nudge settings.
    #[must_use]
    pub const fn with_default_nudge_interval(mut self, interval: TimeDelta) -> Self {
        self.default_nudge_interval = interval;
        self
    }

    /// Returns the metrics this worker records into.
    #[must_use]
    pub fn metrics(&self) -> &Arc<SchedulerMetrics> {
        &self.metrics
    }

    /// Runs one polling cycle.
    ///
    /// Each due reminder is published and then conditionally marked sent.
    /// Delivered reminders may spawn a follow-up nudge. A failure on one
    /// reminder is recorded in the report and does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::Fetch`] when due reminders cannot be
    /// loaded. Nothing is processed in that case.
    pub async fn process_reminders(&self) -> Result<CycleReport, ProcessingError> {
        let started = Instant::now();
        let now = self.clock.utc();
        let due = match self.ports.reminders.find_due(now).await {
            Ok(due) => due,
            Err(err) => {
                self.metrics.record_errors(1);
                return Err(ProcessingError::Fetch(err));
            }
        };

        let mut report = CycleReport {
            due: due.len(),
            ..CycleReport::default()
        };
        if due.is_empty() {
            return Ok(report);
        }

        for reminder in &due {
            self.process_one(reminder, &mut report).await;
        }

        self.metrics.record_processed(count(report.delivered));
        self.metrics.record_nudges(count(report.nudges_created));
        self.metrics.record_errors(count(report.errors.len()));
        self.metrics.record_cycle(started.elapsed(), self.clock.utc());
        tracing::debug!(
            due = report.due,
            delivered = report.delivered,
            already_delivered = report.already_delivered,
            nudges = report.nudges_created,
            errors = report.errors.len(),
            "reminder cycle finished"
        );
        Ok(report)
    }

    async fn process_one(&self, reminder: &Reminder, report: &mut CycleReport) {
        match self.deliver(reminder).await {
            Ok(true) => report.delivered += 1,
            Ok(false) => {
                tracing::debug!(
                    reminder_id = %reminder.id(),
                    "reminder already delivered by another worker"
                );
                report.already_delivered += 1;
                return;
            }
            Err(err) => {
                tracing::warn!(
                    reminder_id = %reminder.id(),
                    error = %err,
                    "reminder delivery failed"
                );
                report.errors.push(err);
                return;
            }
        }

        match self.schedule_nudge(reminder).await {
            Ok(Some(nudge)) => {
                tracing::info!(
                    task_id = %nudge.task_id(),
                    reminder_id = %nudge.id(),
                    scheduled_at = %nudge.scheduled_at(),
                    "nudge scheduled"
                );
                report.nudges_created += 1;
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(
                    task_id = %reminder.task_id(),
                    error = %err,
                    "nudge evaluation failed"
                );
                report.errors.push(err);
            }
        }
    }

    /// Publishes the reminder and claims it. Returns `false` when another
    /// worker claimed it first.
    async fn deliver(&self, reminder: &Reminder) -> Result<bool, ProcessingError> {
        let event = NudgeEvent::ReminderDue {
            reminder_id: reminder.id(),
            task_id: reminder.task_id(),
            user_id: reminder.user_id(),
            chat_id: reminder.chat_id(),
            kind: reminder.kind(),
        };
        self.ports
            .events
            .publish(&event)
            .await
            .map_err(|source| ProcessingError::Delivery {
                reminder_id: reminder.id(),
                source,
            })?;
        self.ports
            .reminders
            .mark_sent(reminder.id(), self.clock.utc())
            .await
            .map_err(|source| ProcessingError::MarkSent {
                reminder_id: reminder.id(),
                source,
            })
    }

    async fn schedule_nudge(
        &self,
        reminder: &Reminder,
    ) -> Result<Option<Reminder>, ProcessingError> {
        let task_id = reminder.task_id();
        let Some(task) = self
            .ports
            .tasks
            .find_by_id(task_id)
            .await
            .map_err(|source| ProcessingError::TaskLookup { task_id, source })?
        else {
            tracing::debug!(task_id = %task_id, "reminder task no longer exists");
            return Ok(None);
        };

        let settings = get_or_create_settings(
            &*self.ports.reminders,
            task.owner(),
            self.default_nudge_interval,
            &*self.clock,
        )
        .await
        .map_err(|source| ProcessingError::Settings {
            user_id: task.owner(),
            source,
        })?;

        let nudge_count = self
            .ports
            .reminders
            .list_by_task(task_id)
            .await
            .map_err(|source| ProcessingError::NudgeCreation { task_id, source })?
            .iter()
            .filter(|existing| existing.kind() == ReminderKind::Nudge)
            .count();
        let existing_nudges = u32::try_from(nudge_count).unwrap_or(u32::MAX);

        if !self
            .policy
            .should_create_nudge(&task, existing_nudges, &settings, self.clock.utc())
        {
            return Ok(None);
        }

        let scheduled_at = self.policy.next_nudge_time(reminder.scheduled_at(), &settings);
        let nudge = Reminder::nudge_after(reminder, scheduled_at);
        let created = self
            .ports
            .reminders
            .create_nudge_within_budget(&nudge, settings.max_nudges())
            .await
            .map_err(|source| ProcessingError::NudgeCreation { task_id, source })?;
        if !created {
            tracing::debug!(task_id = %task_id, "nudge budget spent by a concurrent worker");
            return Ok(None);
        }
        Ok(Some(nudge))
    }
}

fn count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

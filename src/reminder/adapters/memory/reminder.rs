//! In-memory repository for reminders and nudge settings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::reminder::{
    domain::{NudgeSettings, Reminder, ReminderId, ReminderKind},
    ports::{ReminderRepository, ReminderRepositoryError, ReminderRepositoryResult},
};
use crate::task::domain::{TaskId, UserId};

/// Thread-safe in-memory reminder repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReminderRepository {
    state: Arc<RwLock<InMemoryReminderState>>,
}

#[derive(Debug, Default)]
struct InMemoryReminderState {
    reminders: HashMap<ReminderId, Reminder>,
    settings: HashMap<UserId, NudgeSettings>,
}

impl InMemoryReminderRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ReminderRepositoryError {
    ReminderRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn sorted_by_schedule(mut reminders: Vec<Reminder>) -> Vec<Reminder> {
    reminders.sort_by_key(|reminder| (reminder.scheduled_at(), reminder.id()));
    reminders
}

#[async_trait]
impl ReminderRepository for InMemoryReminderRepository {
    async fn create(&self, reminder: &Reminder) -> ReminderRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.reminders.contains_key(&reminder.id()) {
            return Err(ReminderRepositoryError::DuplicateReminder(reminder.id()));
        }
        state.reminders.insert(reminder.id(), reminder.clone());
        Ok(())
    }

    async fn find_due(&self, now: DateTime<Utc>) -> ReminderRepositoryResult<Vec<Reminder>> {
        let state = self.state.read().map_err(lock_error)?;
        let due = state
            .reminders
            .values()
            .filter(|reminder| reminder.is_due(now))
            .cloned()
            .collect();
        Ok(sorted_by_schedule(due))
    }

    async fn mark_sent(
        &self,
        id: ReminderId,
        sent_at: DateTime<Utc>,
    ) -> ReminderRepositoryResult<bool> {
        // Check and write under one write guard, mirroring `WHERE sent_at IS NULL`.
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(state
            .reminders
            .get_mut(&id)
            .is_some_and(|reminder| reminder.mark_sent(sent_at)))
    }

    async fn create_nudge_within_budget(
        &self,
        nudge: &Reminder,
        max_nudges: u32,
    ) -> ReminderRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.reminders.contains_key(&nudge.id()) {
            return Err(ReminderRepositoryError::DuplicateReminder(nudge.id()));
        }
        let existing = state
            .reminders
            .values()
            .filter(|reminder| {
                reminder.task_id() == nudge.task_id() && reminder.kind() == ReminderKind::Nudge
            })
            .count();
        if u32::try_from(existing).unwrap_or(u32::MAX) >= max_nudges {
            return Ok(false);
        }
        state.reminders.insert(nudge.id(), nudge.clone());
        Ok(true)
    }

    async fn list_by_task(&self, task_id: TaskId) -> ReminderRepositoryResult<Vec<Reminder>> {
        let state = self.state.read().map_err(lock_error)?;
        let reminders = state
            .reminders
            .values()
            .filter(|reminder| reminder.task_id() == task_id)
            .cloned()
            .collect();
        Ok(sorted_by_schedule(reminders))
    }

    async fn delete(&self, id: ReminderId) -> ReminderRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .reminders
            .remove(&id)
            .map(|_| ())
            .ok_or(ReminderRepositoryError::NotFound(id))
    }

    async fn find_settings(
        &self,
        user_id: UserId,
    ) -> ReminderRepositoryResult<Option<NudgeSettings>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.settings.get(&user_id).cloned())
    }

    async fn upsert_settings(&self, settings: &NudgeSettings) -> ReminderRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.settings.insert(settings.user_id(), settings.clone());
        Ok(())
    }

    async fn create_settings_if_absent(
        &self,
        settings: &NudgeSettings,
    ) -> ReminderRepositoryResult<NudgeSettings> {
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(state
            .settings
            .entry(settings.user_id())
            .or_insert_with(|| settings.clone())
            .clone())
    }
}

//! `PostgreSQL` repository implementation for reminders and nudge settings.

use super::{
    models::{NudgeSettingsRow, ReminderRow},
    schema::{nudge_settings, reminders},
};
use crate::reminder::{
    domain::{
        NudgeSettings, PersistedNudgeSettingsData, PersistedReminderData, Reminder, ReminderId,
        ReminderKind,
    },
    ports::{ReminderRepository, ReminderRepositoryError, ReminderRepositoryResult},
};
use crate::task::{
    adapters::postgres::NudgePgPool,
    domain::{ChatId, TaskId, UserId},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

/// `PostgreSQL`-backed reminder repository.
#[derive(Debug, Clone)]
pub struct PostgresReminderRepository {
    pool: NudgePgPool,
}

impl PostgresReminderRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: NudgePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReminderRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReminderRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReminderRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReminderRepositoryError::persistence)?
    }
}

#[async_trait]
impl ReminderRepository for PostgresReminderRepository {
    async fn create(&self, reminder: &Reminder) -> ReminderRepositoryResult<()> {
        let reminder_id = reminder.id();
        let row = reminder_to_row(reminder);

        self.run_blocking(move |connection| {
            diesel::insert_into(reminders::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReminderRepositoryError::DuplicateReminder(reminder_id)
                    }
                    _ => ReminderRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_due(&self, now: DateTime<Utc>) -> ReminderRepositoryResult<Vec<Reminder>> {
        self.run_blocking(move |connection| {
            let rows = reminders::table
                .filter(reminders::scheduled_at.le(now))
                .filter(reminders::sent_at.is_null())
                .order(reminders::scheduled_at.asc())
                .select(ReminderRow::as_select())
                .load::<ReminderRow>(connection)
                .map_err(ReminderRepositoryError::persistence)?;
            rows.into_iter().map(row_to_reminder).collect()
        })
        .await
    }

    async fn mark_sent(
        &self,
        id: ReminderId,
        sent_at: DateTime<Utc>,
    ) -> ReminderRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            // The IS NULL guard makes concurrent claims mutually exclusive.
            let updated_count = diesel::update(
                reminders::table
                    .filter(reminders::id.eq(id.into_inner()))
                    .filter(reminders::sent_at.is_null()),
            )
            .set(reminders::sent_at.eq(sent_at))
            .execute(connection)
            .map_err(ReminderRepositoryError::persistence)?;
            Ok(updated_count == 1)
        })
        .await
    }

    async fn create_nudge_within_budget(
        &self,
        nudge: &Reminder,
        max_nudges: u32,
    ) -> ReminderRepositoryResult<bool> {
        let row = reminder_to_row(nudge);
        let budget = i64::from(max_nudges);

        self.run_blocking(move |connection| {
            connection
                .transaction::<bool, DieselError, _>(|tx| {
                    // Serialises budget checks for one task across workers.
                    diesel::sql_query("SELECT id FROM tasks WHERE id = $1 FOR UPDATE")
                        .bind::<diesel::sql_types::Uuid, _>(row.task_id)
                        .execute(tx)?;
                    let existing: i64 = reminders::table
                        .filter(reminders::task_id.eq(row.task_id))
                        .filter(reminders::kind.eq(ReminderKind::Nudge.as_str()))
                        .count()
                        .get_result(tx)?;
                    if existing >= budget {
                        return Ok(false);
                    }
                    diesel::insert_into(reminders::table)
                        .values(&row)
                        .execute(tx)?;
                    Ok(true)
                })
                .map_err(ReminderRepositoryError::persistence)
        })
        .await
    }

    async fn list_by_task(&self, task_id: TaskId) -> ReminderRepositoryResult<Vec<Reminder>> {
        self.run_blocking(move |connection| {
            let rows = reminders::table
                .filter(reminders::task_id.eq(task_id.into_inner()))
                .order(reminders::scheduled_at.asc())
                .select(ReminderRow::as_select())
                .load::<ReminderRow>(connection)
                .map_err(ReminderRepositoryError::persistence)?;
            rows.into_iter().map(row_to_reminder).collect()
        })
        .await
    }

    async fn delete(&self, id: ReminderId) -> ReminderRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count =
                diesel::delete(reminders::table.filter(reminders::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(ReminderRepositoryError::persistence)?;
            if deleted_count == 0 {
                return Err(ReminderRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_settings(
        &self,
        user_id: UserId,
    ) -> ReminderRepositoryResult<Option<NudgeSettings>> {
        self.run_blocking(move |connection| {
            let row = nudge_settings::table
                .filter(nudge_settings::user_id.eq(user_id.value()))
                .select(NudgeSettingsRow::as_select())
                .first::<NudgeSettingsRow>(connection)
                .optional()
                .map_err(ReminderRepositoryError::persistence)?;
            row.map(row_to_settings).transpose()
        })
        .await
    }

    async fn upsert_settings(&self, settings: &NudgeSettings) -> ReminderRepositoryResult<()> {
        let row = settings_to_row(settings)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(nudge_settings::table)
                .values(&row)
                .on_conflict(nudge_settings::user_id)
                .do_update()
                .set((
                    nudge_settings::nudge_interval_secs
                        .eq(excluded(nudge_settings::nudge_interval_secs)),
                    nudge_settings::max_nudges.eq(excluded(nudge_settings::max_nudges)),
                    nudge_settings::enabled.eq(excluded(nudge_settings::enabled)),
                    nudge_settings::updated_at.eq(excluded(nudge_settings::updated_at)),
                ))
                .execute(connection)
                .map_err(ReminderRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn create_settings_if_absent(
        &self,
        settings: &NudgeSettings,
    ) -> ReminderRepositoryResult<NudgeSettings> {
        let row = settings_to_row(settings)?;
        let user_id = row.user_id;

        self.run_blocking(move |connection| {
            diesel::insert_into(nudge_settings::table)
                .values(&row)
                .on_conflict(nudge_settings::user_id)
                .do_nothing()
                .execute(connection)
                .map_err(ReminderRepositoryError::persistence)?;
            let stored = nudge_settings::table
                .filter(nudge_settings::user_id.eq(user_id))
                .select(NudgeSettingsRow::as_select())
                .first::<NudgeSettingsRow>(connection)
                .map_err(ReminderRepositoryError::persistence)?;
            row_to_settings(stored)
        })
        .await
    }
}

fn reminder_to_row(reminder: &Reminder) -> ReminderRow {
    ReminderRow {
        id: reminder.id().into_inner(),
        task_id: reminder.task_id().into_inner(),
        user_id: reminder.user_id().value(),
        chat_id: reminder.chat_id().value(),
        scheduled_at: reminder.scheduled_at(),
        sent_at: reminder.sent_at(),
        kind: reminder.kind().as_str().to_owned(),
    }
}

fn row_to_reminder(row: ReminderRow) -> ReminderRepositoryResult<Reminder> {
    let kind =
        ReminderKind::try_from(row.kind.as_str()).map_err(ReminderRepositoryError::persistence)?;
    Ok(Reminder::from_persisted(PersistedReminderData {
        id: ReminderId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        user_id: UserId::new(row.user_id),
        chat_id: ChatId::new(row.chat_id),
        scheduled_at: row.scheduled_at,
        sent_at: row.sent_at,
        kind,
    }))
}

fn settings_to_row(settings: &NudgeSettings) -> ReminderRepositoryResult<NudgeSettingsRow> {
    let max_nudges =
        i32::try_from(settings.max_nudges()).map_err(ReminderRepositoryError::persistence)?;
    Ok(NudgeSettingsRow {
        user_id: settings.user_id().value(),
        nudge_interval_secs: settings.nudge_interval().num_seconds(),
        max_nudges,
        enabled: settings.enabled(),
        created_at: settings.created_at(),
        updated_at: settings.updated_at(),
    })
}

fn row_to_settings(row: NudgeSettingsRow) -> ReminderRepositoryResult<NudgeSettings> {
    let max_nudges =
        u32::try_from(row.max_nudges).map_err(ReminderRepositoryError::persistence)?;
    let nudge_interval = TimeDelta::try_seconds(row.nudge_interval_secs).ok_or_else(|| {
        ReminderRepositoryError::persistence(std::io::Error::other(format!(
            "nudge interval out of range: {}s",
            row.nudge_interval_secs
        )))
    })?;
    Ok(NudgeSettings::from_persisted(PersistedNudgeSettingsData {
        user_id: UserId::new(row.user_id),
        nudge_interval,
        max_nudges,
        enabled: row.enabled,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

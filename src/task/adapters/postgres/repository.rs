//! `PostgreSQL` repository implementation for task storage.

use super::{models::TaskRow, schema::tasks};
use crate::task::{
    domain::{ChatId, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus, UserId},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type shared by the persistence adapters.
pub type NudgePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: NudgePgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: NudgePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(tasks::table.filter(tasks::id.eq(row.id)))
                .set((
                    tasks::chat_id.eq(row.chat_id),
                    tasks::title.eq(&row.title),
                    tasks::description.eq(&row.description),
                    tasks::due_date.eq(row.due_date),
                    tasks::priority.eq(&row.priority),
                    tasks::status.eq(&row.status),
                    tasks::updated_at.eq(row.updated_at),
                    tasks::completed_at.eq(row.completed_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;

            if updated_count == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let query_filter = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::owner_id.eq(owner.value()))
                .select(TaskRow::as_select())
                .into_boxed();
            if let Some(status) = query_filter.status {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(priority) = query_filter.priority {
                query = query.filter(tasks::priority.eq(priority.as_str()));
            }
            if let Some(after) = query_filter.due_after {
                query = query.filter(tasks::due_date.ge(after));
            }
            if let Some(before) = query_filter.due_before {
                query = query.filter(tasks::due_date.le(before));
            }
            // PostgreSQL sorts NULL due dates last in ascending order.
            query = query.order((tasks::due_date.asc(), tasks::created_at.asc()));
            if let Some(limit) = query_filter.limit {
                let row_limit = i64::try_from(limit).map_err(TaskRepositoryError::persistence)?;
                query = query.limit(row_limit);
            }
            let offset =
                i64::try_from(query_filter.offset).map_err(TaskRepositoryError::persistence)?;
            let rows = query
                .offset(offset)
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().value(),
        chat_id: task.chat_id().map(ChatId::value),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        due_date: task.due_date(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        completed_at: task.completed_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority =
        TaskPriority::try_from(row.priority.as_str()).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        owner: UserId::new(row.owner_id),
        chat_id: row.chat_id.map(ChatId::new),
        title: row.title,
        description: row.description,
        due_date: row.due_date,
        priority,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
        completed_at: row.completed_at,
    }))
}

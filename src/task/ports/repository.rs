//! Repository port for task persistence and lookup.

use crate::task::domain::{Task, TaskId, TaskPriority, TaskStatus, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Tasks are never physically removed: deletion is a status transition
/// persisted through [`TaskRepository::update`].
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task (status, due date, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists an owner's tasks matching `filter`.
    ///
    /// Results are ordered by due date (tasks without one last), then by
    /// creation time, before pagination is applied.
    async fn list_by_owner(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Query filter for listing an owner's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Only tasks due at or after this instant.
    pub due_after: Option<DateTime<Utc>>,
    /// Only tasks due at or before this instant.
    pub due_before: Option<DateTime<Utc>>,
    /// Maximum number of tasks returned.
    pub limit: Option<usize>,
    /// Number of matching tasks skipped.
    pub offset: usize,
}

impl TaskFilter {
    /// Restricts results to a status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to a priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts results to tasks due within `[after, before]`.
    #[must_use]
    pub const fn due_between(mut self, after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        self.due_after = Some(after);
        self.due_before = Some(before);
        self
    }

    /// Applies limit/offset pagination.
    #[must_use]
    pub const fn paginate(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    /// Returns whether `task` satisfies every non-pagination criterion.
    ///
    /// A due-date bound excludes tasks without a due date.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = self.status.is_none_or(|status| task.status() == status);
        let priority_ok = self
            .priority
            .is_none_or(|priority| task.priority() == priority);
        let after_ok = self
            .due_after
            .is_none_or(|after| task.due_date().is_some_and(|due| due >= after));
        let before_ok = self
            .due_before
            .is_none_or(|before| task.due_date().is_some_and(|due| due <= before));
        status_ok && priority_ok && after_ok && before_ok
    }
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

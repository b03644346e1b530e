//! Repository port for task persistence, lookup, and reminder scans.

use crate::directory::domain::{TeamId, UserId};
use crate::task::domain::{ReminderFlag, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Listing filter; every field is conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to a workflow status.
    pub status: Option<TaskStatus>,
    /// Restrict to a direct assignee.
    pub assignee: Option<UserId>,
    /// Restrict to an owning team.
    pub team: Option<TeamId>,
    /// Restrict to tasks carrying the tag (case-insensitive).
    pub tag: Option<String>,
    /// Restrict to what the given member may see: tasks they are assigned
    /// or that belong to their team. `None` lists everything (privileged).
    pub visible_to: Option<(UserId, Option<TeamId>)>,
}

/// Half-open scan window used by the reminder scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderScan {
    /// Which latch the scan honours.
    pub flag: ReminderFlag,
    /// Inclusive lower bound on the due date, when the scan has one.
    pub due_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the due date.
    pub due_before: DateTime<Utc>,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task; there is no tombstone.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching the filter, newest first.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns non-completed tasks in the scan window whose latch is still
    /// unset.
    async fn find_for_reminder(&self, scan: ReminderScan) -> TaskRepositoryResult<Vec<Task>>;

    /// Latches a reminder flag on every listed task in one batch.
    async fn mark_reminders_sent(
        &self,
        ids: &[TaskId],
        flag: ReminderFlag,
    ) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
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

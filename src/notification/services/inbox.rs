//! Inbox query surface: listing, mark-as-read, and deletion.

use crate::directory::domain::UserId;
use crate::notification::domain::{Notification, NotificationId};
use crate::notification::ports::{
    NotificationQuery, NotificationRepository, NotificationRepositoryError,
};
use crate::task::domain::{Task, TaskId, TaskStatus};
use crate::task::ports::TaskRepository;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Minimal task projection joined onto inbox entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    /// The task identifier.
    pub id: TaskId,
    /// The task title.
    pub title: String,
    /// The task status.
    pub status: TaskStatus,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_owned(),
            status: task.status(),
        }
    }
}

/// One inbox row: the notification plus its task, when it still exists.
///
/// `task` is `None` for notifications whose task has since been deleted;
/// stale references are tolerated by design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    /// The notification record.
    pub notification: Notification,
    /// The joined task projection, if the task still exists.
    pub task: Option<TaskSummary>,
}

/// One page of a user's inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxPage {
    /// Entries on this page, newest first.
    pub entries: Vec<InboxEntry>,
    /// The 1-based page number served.
    pub page: u32,
    /// Total matching notifications.
    pub total: u64,
    /// Total pages at the requested limit.
    pub total_pages: u64,
}

/// Service-level errors for inbox operations.
#[derive(Debug, Error)]
pub enum InboxError {
    /// No notification has the given identifier.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// The notification belongs to a different user.
    #[error("user {user} does not own notification {notification}")]
    NotOwner {
        /// The requesting user.
        user: UserId,
        /// The notification that was refused.
        notification: NotificationId,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] NotificationRepositoryError),
}

/// Result type for inbox operations.
pub type InboxResult<T> = Result<T, InboxError>;

/// Read-and-maintain surface over a user's own notifications.
#[derive(Clone)]
pub struct NotificationInbox<N, T>
where
    N: NotificationRepository,
    T: TaskRepository,
{
    notifications: Arc<N>,
    tasks: Arc<T>,
}

impl<N, T> NotificationInbox<N, T>
where
    N: NotificationRepository,
    T: TaskRepository,
{
    /// Creates an inbox service.
    #[must_use]
    pub const fn new(notifications: Arc<N>, tasks: Arc<T>) -> Self {
        Self {
            notifications,
            tasks,
        }
    }

    /// Lists the user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`InboxError::Repository`] for store failures. A deleted
    /// task behind a notification is served as an entry without a task
    /// projection, never as an error.
    pub async fn list(&self, user: UserId, query: NotificationQuery) -> InboxResult<InboxPage> {
        let normalized = query.normalized();
        let page = self.notifications.list_for_user(user, normalized).await?;

        let mut entries = Vec::with_capacity(page.items.len());
        for notification in page.items {
            let task = self.load_summary(notification.task_id()).await;
            entries.push(InboxEntry { notification, task });
        }

        Ok(InboxPage {
            entries,
            page: normalized.page,
            total: page.total,
            total_pages: page.total.div_ceil(u64::from(normalized.limit)),
        })
    }

    /// Marks a notification read on behalf of its owner.
    ///
    /// Already-read notifications are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`InboxError::NotFound`] for unknown ids and
    /// [`InboxError::NotOwner`] when the record belongs to someone else.
    pub async fn mark_read(
        &self,
        user: UserId,
        id: NotificationId,
    ) -> InboxResult<Notification> {
        let mut notification = self.load_owned(user, id).await?;
        if notification.mark_read() {
            self.notifications.update(&notification).await?;
        }
        Ok(notification)
    }

    /// Deletes a notification on behalf of its owner.
    ///
    /// # Errors
    ///
    /// Returns [`InboxError::NotFound`] for unknown ids and
    /// [`InboxError::NotOwner`] when the record belongs to someone else.
    pub async fn delete(&self, user: UserId, id: NotificationId) -> InboxResult<()> {
        self.load_owned(user, id).await?;
        self.notifications.delete(id).await?;
        Ok(())
    }

    async fn load_owned(&self, user: UserId, id: NotificationId) -> InboxResult<Notification> {
        let notification = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or(InboxError::NotFound(id))?;

        if notification.recipient() != user {
            return Err(InboxError::NotOwner {
                user,
                notification: id,
            });
        }
        Ok(notification)
    }

    async fn load_summary(&self, task_id: TaskId) -> Option<TaskSummary> {
        match self.tasks.find_by_id(task_id).await {
            Ok(task) => task.as_ref().map(TaskSummary::from),
            Err(err) => {
                warn!(task = %task_id, error = %err, "task join failed while listing inbox");
                None
            }
        }
    }
}

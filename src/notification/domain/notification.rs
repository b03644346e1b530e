//! Notification aggregate and its enums.

use super::{NotificationId, ParseNotificationStatusError, ParseNotificationTypeError};
use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// The recipient was assigned a task directly.
    TaskAssigned,
    /// The recipient's team was assigned a task.
    TeamTaskAssigned,
    /// A task the recipient follows changed.
    TaskUpdated,
    /// A task is approaching its deadline.
    TaskDueSoon,
    /// A task has passed its deadline.
    TaskOverdue,
    /// A comment was added to a task.
    CommentAdded,
    /// A member-reported completion awaits the recipient's approval.
    TaskPendingApproval,
    /// The recipient's completion was approved.
    TaskApproved,
    /// The recipient's completion was rejected.
    TaskRejected,
    /// Anything else.
    Other,
}

impl NotificationType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::TeamTaskAssigned => "team_task_assigned",
            Self::TaskUpdated => "task_updated",
            Self::TaskDueSoon => "task_due_soon",
            Self::TaskOverdue => "task_overdue",
            Self::CommentAdded => "comment_added",
            Self::TaskPendingApproval => "task_pending_approval",
            Self::TaskApproved => "task_approved",
            Self::TaskRejected => "task_rejected",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for NotificationType {
    type Error = ParseNotificationTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "task_assigned" => Ok(Self::TaskAssigned),
            "team_task_assigned" => Ok(Self::TeamTaskAssigned),
            "task_updated" => Ok(Self::TaskUpdated),
            "task_due_soon" => Ok(Self::TaskDueSoon),
            "task_overdue" => Ok(Self::TaskOverdue),
            "comment_added" => Ok(Self::CommentAdded),
            "task_pending_approval" => Ok(Self::TaskPendingApproval),
            "task_approved" => Ok(Self::TaskApproved),
            "task_rejected" => Ok(Self::TaskRejected),
            "other" => Ok(Self::Other),
            unknown => Err(ParseNotificationTypeError(unknown.to_owned())),
        }
    }
}

/// Read state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The recipient has not read the notification.
    Unread,
    /// The recipient has read the notification.
    Read,
}

impl NotificationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }
}

impl TryFrom<&str> for NotificationStatus {
    type Error = ParseNotificationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            unknown => Err(ParseNotificationStatusError(unknown.to_owned())),
        }
    }
}

/// Persisted in-app notification.
///
/// Created exclusively by the dispatcher; only the owning user marks it
/// read or deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    recipient: UserId,
    task_id: TaskId,
    kind: NotificationType,
    status: NotificationStatus,
    message: String,
    link: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNotificationData {
    /// Persisted notification identifier.
    pub id: NotificationId,
    /// Persisted recipient reference.
    pub recipient: UserId,
    /// Persisted task reference; may dangle after task deletion.
    pub task_id: TaskId,
    /// Persisted notification type.
    pub kind: NotificationType,
    /// Persisted read state.
    pub status: NotificationStatus,
    /// Persisted message text.
    pub message: String,
    /// Persisted link, if any.
    pub link: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a fresh unread notification.
    #[must_use]
    pub fn new(
        recipient: UserId,
        task_id: TaskId,
        kind: NotificationType,
        message: impl Into<String>,
        link: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient,
            task_id,
            kind,
            status: NotificationStatus::Unread,
            message: message.into(),
            link,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNotificationData) -> Self {
        Self {
            id: data.id,
            recipient: data.recipient,
            task_id: data.task_id,
            kind: data.kind,
            status: data.status,
            message: data.message,
            link: data.link,
            created_at: data.created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the related task reference.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the notification type.
    #[must_use]
    pub const fn kind(&self) -> NotificationType {
        self.kind
    }

    /// Returns the read state.
    #[must_use]
    pub const fn status(&self) -> NotificationStatus {
        self.status
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the link, if any.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the notification read; returns `true` when the state changed.
    pub fn mark_read(&mut self) -> bool {
        if self.status == NotificationStatus::Read {
            return false;
        }
        self.status = NotificationStatus::Read;
        true
    }
}

//! Dispatch intents emitted by the lifecycle engine and the scheduler.

use super::NotificationType;
use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use serde::{Deserialize, Serialize};

/// One queued request to notify one recipient about one task event.
///
/// Resolution of "who" is the producer's job; an intent always targets a
/// single recipient, and the worker dispatches each intent independently of
/// its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    recipient: UserId,
    task_id: TaskId,
    kind: NotificationType,
    message: String,
    link: Option<String>,
    email_subject: Option<String>,
}

impl NotificationIntent {
    /// Creates an in-app-only intent.
    #[must_use]
    pub fn new(
        recipient: UserId,
        task_id: TaskId,
        kind: NotificationType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            task_id,
            kind,
            message: message.into(),
            link: None,
            email_subject: None,
        }
    }

    /// Attaches a link to the related task.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Also requests an email with the given subject; the worker resolves
    /// the recipient's address and skips silently when none is on file.
    #[must_use]
    pub fn with_email(mut self, subject: impl Into<String>) -> Self {
        self.email_subject = Some(subject.into());
        self
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the related task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the notification type.
    #[must_use]
    pub const fn kind(&self) -> NotificationType {
        self.kind
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

    /// Returns the requested email subject, if any.
    #[must_use]
    pub fn email_subject(&self) -> Option<&str> {
        self.email_subject.as_deref()
    }
}

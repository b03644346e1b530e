//! Repository port for notification persistence and inbox queries.

use crate::directory::domain::UserId;
use crate::notification::domain::{Notification, NotificationId, NotificationStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification repository operations.
pub type NotificationRepositoryResult<T> = Result<T, NotificationRepositoryError>;

/// Page request for inbox listings. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Optional read-state filter.
    pub status: Option<NotificationStatus>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            limit: 10,
        }
    }
}

impl NotificationQuery {
    /// Returns the page and limit clamped to at least one.
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self {
            status: self.status,
            page: if self.page == 0 { 1 } else { self.page },
            limit: if self.limit == 0 { 1 } else { self.limit },
        }
    }

    /// Returns the number of records to skip.
    #[must_use]
    pub fn offset(self) -> u64 {
        let normalized = self.normalized();
        (u64::from(normalized.page) - 1) * u64::from(normalized.limit)
    }
}

/// One page of a user's inbox plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPage {
    /// The records on this page, newest first.
    pub items: Vec<Notification>,
    /// Total matching records across all pages.
    pub total: u64,
}

/// Notification persistence contract.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Stores a new notification record.
    async fn insert(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Finds a notification by identifier.
    ///
    /// Returns `None` when the record does not exist.
    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>>;

    /// Lists a user's notifications, newest first, with the total count.
    async fn list_for_user(
        &self,
        recipient: UserId,
        query: NotificationQuery,
    ) -> NotificationRepositoryResult<NotificationPage>;

    /// Persists changes to an existing notification (read-state flips).
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::NotFound`] when the record
    /// does not exist.
    async fn update(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Deletes a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::NotFound`] when the record
    /// does not exist.
    async fn delete(&self, id: NotificationId) -> NotificationRepositoryResult<()>;
}

/// Errors returned by notification repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationRepositoryError {
    /// The notification was not found.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

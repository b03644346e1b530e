//! Diesel row models for notification persistence.

use super::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for notification records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Recipient user.
    pub recipient_id: uuid::Uuid,
    /// Related task.
    pub task_id: uuid::Uuid,
    /// Notification type.
    pub kind: String,
    /// Read state.
    pub status: String,
    /// Message text.
    pub message: String,
    /// Optional in-app link.
    pub link: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert/update model for notification records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = notifications)]
#[diesel(treat_none_as_null = true)]
pub struct NewNotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Recipient user.
    pub recipient_id: uuid::Uuid,
    /// Related task.
    pub task_id: uuid::Uuid,
    /// Notification type.
    pub kind: String,
    /// Read state.
    pub status: String,
    /// Message text.
    pub message: String,
    /// Optional in-app link.
    pub link: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

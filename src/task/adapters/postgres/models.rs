//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Workflow status.
    pub status: String,
    /// Label set as a JSON array of strings.
    pub tags: Value,
    /// Direct assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Owning team.
    pub team_id: Option<uuid::Uuid>,
    /// Approved completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Member-reported completion awaiting approval.
    pub needs_completion_approval: bool,
    /// Due-soon reminder latch.
    pub due_reminder_sent: bool,
    /// Overdue reminder latch.
    pub overdue_reminder_sent: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert/update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Workflow status.
    pub status: String,
    /// Label set as a JSON array of strings.
    pub tags: Value,
    /// Direct assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Owning team.
    pub team_id: Option<uuid::Uuid>,
    /// Approved completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Member-reported completion awaiting approval.
    pub needs_completion_approval: bool,
    /// Due-soon reminder latch.
    pub due_reminder_sent: bool,
    /// Overdue reminder latch.
    pub overdue_reminder_sent: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

//! Task aggregate root and related lifecycle types.

use super::{ParseTaskStatusError, TaskDomainError, TaskId};
use crate::directory::domain::{TeamId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Pending,
    /// Work is underway.
    InProgress,
    /// Work has been reported complete.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Who a task is assigned to.
///
/// A task is owned by a single user, by a whole team, or by nobody; it can
/// never reference a user and a team at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskOwner {
    /// No assignee and no team.
    Unowned,
    /// Assigned to a single user.
    User {
        /// The assignee.
        id: UserId,
    },
    /// Assigned to a team as a whole.
    Team {
        /// The owning team.
        id: TeamId,
    },
}

impl TaskOwner {
    /// Builds an owner from the optional wire references.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AssigneeAndTeam`] when both references
    /// are present.
    pub const fn from_refs(
        assignee: Option<UserId>,
        team: Option<TeamId>,
    ) -> Result<Self, TaskDomainError> {
        match (assignee, team) {
            (Some(_), Some(_)) => Err(TaskDomainError::AssigneeAndTeam),
            (Some(id), None) => Ok(Self::User { id }),
            (None, Some(id)) => Ok(Self::Team { id }),
            (None, None) => Ok(Self::Unowned),
        }
    }

    /// Returns the direct assignee, if any.
    #[must_use]
    pub const fn assignee(self) -> Option<UserId> {
        match self {
            Self::User { id } => Some(id),
            _ => None,
        }
    }

    /// Returns the owning team, if any.
    #[must_use]
    pub const fn team(self) -> Option<TeamId> {
        match self {
            Self::Team { id } => Some(id),
            _ => None,
        }
    }
}

/// One-way reminder latches maintained by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderFlag {
    /// The due-soon reminder has been fanned out.
    DueSoon,
    /// The overdue reminder has been fanned out.
    Overdue,
}

/// Validated input for creating a task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Task title; must be non-empty after trimming.
    pub title: String,
    /// Task description; must be non-empty after trimming.
    pub description: String,
    /// Deadline for the work.
    pub due_date: DateTime<Utc>,
    /// Initial status; defaults to [`TaskStatus::Pending`].
    pub status: TaskStatus,
    /// Free-form labels.
    pub tags: BTreeSet<String>,
    /// Initial assignment.
    pub owner: TaskOwner,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    status: TaskStatus,
    tags: BTreeSet<String>,
    owner: TaskOwner,
    completed_at: Option<DateTime<Utc>>,
    needs_completion_approval: bool,
    due_reminder_sent: bool,
    overdue_reminder_sent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted deadline.
    pub due_date: DateTime<Utc>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted labels.
    pub tags: BTreeSet<String>,
    /// Persisted assignment.
    pub owner: TaskOwner,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted approval flag.
    pub needs_completion_approval: bool,
    /// Persisted due-soon latch.
    pub due_reminder_sent: bool,
    /// Persisted overdue latch.
    pub overdue_reminder_sent: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task.
    ///
    /// A task created with [`TaskStatus::Completed`] is stamped as approved
    /// complete; only privileged actors create tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title or description is empty
    /// after trimming.
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = non_empty(data.title, TaskDomainError::EmptyTitle)?;
        let description = non_empty(data.description, TaskDomainError::EmptyDescription)?;
        let timestamp = clock.utc();
        let completed_at = (data.status == TaskStatus::Completed).then_some(timestamp);

        Ok(Self {
            id: TaskId::new(),
            title,
            description,
            due_date: data.due_date,
            status: data.status,
            tags: data.tags,
            owner: data.owner,
            completed_at,
            needs_completion_approval: false,
            due_reminder_sent: false,
            overdue_reminder_sent: false,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            status: data.status,
            tags: data.tags,
            owner: data.owner,
            completed_at: data.completed_at,
            needs_completion_approval: data.needs_completion_approval,
            due_reminder_sent: data.due_reminder_sent,
            overdue_reminder_sent: data.overdue_reminder_sent,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the labels.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the assignment.
    #[must_use]
    pub const fn owner(&self) -> TaskOwner {
        self.owner
    }

    /// Returns the direct assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.owner.assignee()
    }

    /// Returns the owning team, if any.
    #[must_use]
    pub const fn team_id(&self) -> Option<TeamId> {
        self.owner.team()
    }

    /// Returns the completion timestamp.
    ///
    /// Non-`None` exactly when the status is [`TaskStatus::Completed`] and
    /// the completion has been approved.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns `true` while a member-reported completion awaits approval.
    #[must_use]
    pub const fn needs_completion_approval(&self) -> bool {
        self.needs_completion_approval
    }

    /// Returns the due-soon reminder latch.
    #[must_use]
    pub const fn due_reminder_sent(&self) -> bool {
        self.due_reminder_sent
    }

    /// Returns the overdue reminder latch.
    #[must_use]
    pub const fn overdue_reminder_sent(&self) -> bool {
        self.overdue_reminder_sent
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the new title is empty
    /// after trimming.
    pub fn set_title(
        &mut self,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let validated = non_empty(title.into(), TaskDomainError::EmptyTitle)?;
        self.title = validated;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the new
    /// description is empty after trimming.
    pub fn set_description(
        &mut self,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let validated = non_empty(description.into(), TaskDomainError::EmptyDescription)?;
        self.description = validated;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the deadline.
    ///
    /// Reminder latches are deliberately left untouched: a pushed-out due
    /// date does not rearm reminders that already fired.
    pub fn set_due_date(&mut self, due_date: DateTime<Utc>, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    /// Replaces the labels.
    pub fn set_tags(&mut self, tags: BTreeSet<String>, clock: &impl Clock) {
        self.tags = tags;
        self.touch(clock);
    }

    /// Replaces the assignment.
    ///
    /// Assigning to a user clears any team and vice versa; the
    /// [`TaskOwner`] representation makes both owners at once
    /// unrepresentable.
    pub fn set_owner(&mut self, owner: TaskOwner, clock: &impl Clock) {
        self.owner = owner;
        self.touch(clock);
    }

    /// Applies a planned status delta.
    pub fn apply_status(
        &mut self,
        status: TaskStatus,
        needs_completion_approval: bool,
        completed_at: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) {
        self.status = status;
        self.needs_completion_approval = needs_completion_approval;
        self.completed_at = completed_at;
        self.touch(clock);
    }

    /// Latches a reminder flag; latches are never cleared here.
    pub fn mark_reminder_sent(&mut self, flag: ReminderFlag) {
        match flag {
            ReminderFlag::DueSoon => self.due_reminder_sent = true,
            ReminderFlag::Overdue => self.overdue_reminder_sent = true,
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn non_empty(raw: String, error: TaskDomainError) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

//! Discriminated update commands and the field-permission policy.

use super::{TaskPermissionError, TaskStatus};
use crate::directory::domain::{Role, TeamId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Mutable task fields named by the permission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    /// The task title.
    Title,
    /// The task description.
    Description,
    /// The deadline.
    DueDate,
    /// The workflow status.
    Status,
    /// The label set.
    Tags,
    /// The direct assignee reference.
    Assignee,
    /// The owning team reference.
    Team,
}

impl TaskField {
    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::DueDate => "due_date",
            Self::Status => "status",
            Self::Tags => "tags",
            Self::Assignee => "assignee",
            Self::Team => "team",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields a privileged actor may submit.
pub const PRIVILEGED_FIELDS: [TaskField; 7] = [
    TaskField::Title,
    TaskField::Description,
    TaskField::DueDate,
    TaskField::Status,
    TaskField::Tags,
    TaskField::Assignee,
    TaskField::Team,
];

/// The fields a regular member may submit.
pub const MEMBER_FIELDS: [TaskField; 1] = [TaskField::Status];

/// Pure field-permission policy: the set of fields a role may mutate.
#[must_use]
pub const fn allowed_fields(role: Role) -> &'static [TaskField] {
    if role.is_privileged() {
        &PRIVILEGED_FIELDS
    } else {
        &MEMBER_FIELDS
    }
}

/// Tri-state patch for optional reference fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPatch<T> {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Clear the current value.
    Clear,
    /// Replace the current value.
    Set(T),
}

impl<T> FieldPatch<T> {
    /// Returns `true` when the patch leaves the field untouched.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Full-field edit submitted by a privileged actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    /// New title, when present.
    pub title: Option<String>,
    /// New description, when present.
    pub description: Option<String>,
    /// New deadline, when present.
    pub due_date: Option<DateTime<Utc>>,
    /// New status, when present.
    pub status: Option<TaskStatus>,
    /// New label set, when present.
    pub tags: Option<BTreeSet<String>>,
    /// Assignee patch; setting an assignee clears any team.
    pub assignee: FieldPatch<UserId>,
    /// Team patch; setting a team clears any assignee.
    pub team: FieldPatch<TeamId>,
}

impl TaskEdit {
    /// Returns `true` when the edit touches nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.tags.is_none()
            && self.assignee.is_keep()
            && self.team.is_keep()
    }
}

/// Update command validated at the boundary, keyed by actor role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Privileged full-field edit.
    Edit(TaskEdit),
    /// Member status-only update.
    SetStatus(TaskStatus),
    /// An empty body; the task is echoed back unchanged.
    Noop,
}

/// Raw partial update as received from the transport layer.
///
/// `status` travels as a wire string so that malformed enum values surface
/// as validation errors from the engine rather than transport decode
/// failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title, when the key was present.
    pub title: Option<String>,
    /// New description, when the key was present.
    pub description: Option<String>,
    /// New deadline, when the key was present.
    pub due_date: Option<DateTime<Utc>>,
    /// New status wire value, when the key was present.
    pub status: Option<String>,
    /// New label set, when the key was present.
    pub tags: Option<BTreeSet<String>>,
    /// Assignee patch.
    #[serde(skip)]
    pub assignee: FieldPatch<UserId>,
    /// Team patch.
    #[serde(skip)]
    pub team: FieldPatch<TeamId>,
}

impl UpdateTaskRequest {
    /// Validates the request against the field policy for `role` and
    /// produces the engine command.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPermissionError::FieldNotAllowed`] when a
    /// non-privileged role submits any key other than `status`, and a
    /// status parse error when the wire value is not a recognised status.
    pub fn into_command(
        self,
        role: Role,
    ) -> Result<TaskCommand, UpdateRequestError> {
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()
            .map_err(UpdateRequestError::UnknownStatus)?;

        if role.is_privileged() {
            return Ok(TaskCommand::Edit(TaskEdit {
                title: self.title,
                description: self.description,
                due_date: self.due_date,
                status,
                tags: self.tags,
                assignee: self.assignee,
                team: self.team,
            }));
        }

        if let Some(field) = self.first_forbidden_field() {
            return Err(UpdateRequestError::Forbidden(
                TaskPermissionError::FieldNotAllowed(field),
            ));
        }

        Ok(status.map_or(TaskCommand::Noop, TaskCommand::SetStatus))
    }

    fn first_forbidden_field(&self) -> Option<TaskField> {
        if self.title.is_some() {
            return Some(TaskField::Title);
        }
        if self.description.is_some() {
            return Some(TaskField::Description);
        }
        if self.due_date.is_some() {
            return Some(TaskField::DueDate);
        }
        if self.tags.is_some() {
            return Some(TaskField::Tags);
        }
        if !self.assignee.is_keep() {
            return Some(TaskField::Assignee);
        }
        if !self.team.is_keep() {
            return Some(TaskField::Team);
        }
        None
    }
}

/// Errors raised while validating an update request at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateRequestError {
    /// The status wire value did not parse.
    #[error(transparent)]
    UnknownStatus(#[from] super::ParseTaskStatusError),

    /// The role may not touch a submitted field.
    #[error(transparent)]
    Forbidden(TaskPermissionError),
}

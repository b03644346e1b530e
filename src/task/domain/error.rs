//! Error types for task domain validation and permission checks.

use thiserror::Error;

use super::{TaskField, TaskId};
use crate::directory::domain::{TeamId, UserId};

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// A request named both an assignee and a team.
    #[error("a task may be assigned to a user or a team, not both")]
    AssigneeAndTeam,

    /// The referenced assignee does not resolve to a user.
    #[error("assignee does not exist: {0}")]
    UnknownAssignee(UserId),

    /// The referenced team does not resolve.
    #[error("team does not exist: {0}")]
    UnknownTeam(TeamId),

    /// The status wire value is not a recognised enum member.
    #[error(transparent)]
    UnknownStatus(#[from] ParseTaskStatusError),
}

/// Error returned while parsing task statuses from wire or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Permission failures distinguished from validation and not-found errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskPermissionError {
    /// The actor's role does not permit the operation at all.
    #[error("role does not permit this operation")]
    PrivilegeRequired,

    /// A non-privileged actor submitted a field other than `status`.
    #[error("only the status field may be updated by this role: {0}")]
    FieldNotAllowed(TaskField),

    /// The actor does not own the task directly or through their team.
    #[error("user {user} may not act on task {task}")]
    NotOwner {
        /// The acting user.
        user: UserId,
        /// The task the actor attempted to mutate.
        task: TaskId,
    },
}

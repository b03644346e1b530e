//! Authenticated actor context attached to every task mutation.

use super::Task;
use crate::directory::domain::{Role, TeamId, UserId};
use serde::{Deserialize, Serialize};

/// The authenticated actor a request runs as.
///
/// Produced by the auth collaborator; the engine only consumes the id, the
/// role, and the team reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: Role,
    team_id: Option<TeamId>,
}

/// Coarse actor classification used by the transition planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorClass {
    /// Admin or Manager: full control, completions auto-approve.
    Privileged,
    /// Regular member: status-only access to owned tasks, completions
    /// require approval.
    Member,
}

impl Actor {
    /// Creates an actor context.
    #[must_use]
    pub const fn new(id: UserId, role: Role, team_id: Option<TeamId>) -> Self {
        Self { id, role, team_id }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the acting user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the acting user's team, if any.
    #[must_use]
    pub const fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    /// Returns `true` for Admin and Manager actors.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }

    /// Returns the planner classification for this actor.
    #[must_use]
    pub const fn class(&self) -> ActorClass {
        if self.is_privileged() {
            ActorClass::Privileged
        } else {
            ActorClass::Member
        }
    }

    /// Returns `true` when a non-privileged actor may mutate the task:
    /// either as its direct assignee, or as a member of the team an
    /// unassigned task belongs to.
    #[must_use]
    pub fn owns(&self, task: &Task) -> bool {
        match (task.assignee_id(), task.team_id()) {
            (Some(assignee), _) => assignee == self.id,
            (None, Some(team)) => self.team_id == Some(team),
            (None, None) => false,
        }
    }

    /// Returns `true` when the actor may read the task: privileged roles
    /// see everything, members see what they own.
    #[must_use]
    pub fn can_view(&self, task: &Task) -> bool {
        self.is_privileged() || self.owns(task)
    }
}

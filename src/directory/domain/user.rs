//! Read-side projection of a user owned by the identity collaborator.

use super::{Role, TeamId, UserId};
use serde::{Deserialize, Serialize};

/// The slice of a user record the task and notification cores consume.
///
/// User accounts, credentials, and profile editing live with the identity
/// collaborator; this projection carries only what dispatch and permission
/// checks need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    username: String,
    display_name: String,
    email: Option<String>,
    role: Role,
    team_id: Option<TeamId>,
}

impl UserProfile {
    /// Creates a user projection.
    #[must_use]
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            email: None,
            role,
            team_id: None,
        }
    }

    /// Sets the email address on file.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the current team membership.
    #[must_use]
    pub const fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the email address on file, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the team the user currently belongs to, if any.
    #[must_use]
    pub const fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }
}

/// Minimal display projection echoed in task and team responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDisplay {
    /// The user identifier.
    pub id: UserId,
    /// The login name.
    pub username: String,
    /// The human-readable display name.
    pub display_name: String,
}

impl From<&UserProfile> for UserDisplay {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id(),
            username: profile.username().to_owned(),
            display_name: profile.display_name().to_owned(),
        }
    }
}

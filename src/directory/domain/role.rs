//! Authorisation roles attached to authenticated actors.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};

/// Role granted to a user by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Management access: task creation, editing, and approval.
    Manager,
    /// Regular member: status-only access to owned tasks.
    User,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }

    /// Returns `true` for roles allowed to mutate any task field, approve
    /// completions, and manage teams.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// The roles that receive completion-approval requests.
    pub const PRIVILEGED: [Self; 2] = [Self::Admin, Self::Manager];
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "user" => Ok(Self::User),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

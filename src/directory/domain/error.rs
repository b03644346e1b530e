//! Error types for directory domain validation and parsing.

use thiserror::Error;

use super::{TeamId, UserId};

/// Errors returned while constructing directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// The proposed leader is not a member of the team.
    #[error("user {user} is not a member of team {team}")]
    LeaderNotAMember {
        /// The proposed leader.
        user: UserId,
        /// The team whose roster was checked.
        team: TeamId,
    },
}

/// Error returned while parsing roles from persistence or tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

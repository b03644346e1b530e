//! Store ports for user projections and team records.

use crate::directory::domain::{Role, Team, TeamId, UserId, UserProfile};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory store operations.
pub type DirectoryStoreResult<T> = Result<T, DirectoryStoreError>;

/// Read and membership-maintenance contract over user projections.
///
/// The identity collaborator owns user records; this port exposes the
/// lookups the cores need plus the single write the roster service performs
/// (moving a user between teams).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user projection by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_by_id(&self, id: UserId) -> DirectoryStoreResult<Option<UserProfile>>;

    /// Returns every user holding one of the given roles.
    async fn find_by_roles(&self, roles: &[Role]) -> DirectoryStoreResult<Vec<UserProfile>>;

    /// Returns every user currently belonging to the given team.
    async fn find_by_team(&self, team_id: TeamId) -> DirectoryStoreResult<Vec<UserProfile>>;

    /// Sets or clears a user's team reference.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::UserNotFound`] when the user does not
    /// exist.
    async fn set_team(&self, id: UserId, team_id: Option<TeamId>) -> DirectoryStoreResult<()>;
}

/// Team persistence contract.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Stores a new team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::DuplicateTeamName`] when another team
    /// already uses the name.
    async fn insert(&self, team: &Team) -> DirectoryStoreResult<()>;

    /// Persists changes to an existing team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::TeamNotFound`] when the team does not
    /// exist and [`DirectoryStoreError::DuplicateTeamName`] when a rename
    /// collides with another team.
    async fn update(&self, team: &Team) -> DirectoryStoreResult<()>;

    /// Deletes a team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::TeamNotFound`] when the team does not
    /// exist.
    async fn delete(&self, id: TeamId) -> DirectoryStoreResult<()>;

    /// Finds a team by identifier.
    ///
    /// Returns `None` when the team does not exist.
    async fn find_by_id(&self, id: TeamId) -> DirectoryStoreResult<Option<Team>>;

    /// Finds a team by its unique name.
    async fn find_by_name(&self, name: &str) -> DirectoryStoreResult<Option<Team>>;

    /// Returns all teams sorted by name.
    async fn list(&self) -> DirectoryStoreResult<Vec<Team>>;
}

/// Errors returned by directory store implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryStoreError {
    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The team was not found.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// Another team already uses the name.
    #[error("team name already exists: {0}")]
    DuplicateTeamName(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! Team roster orchestration: creation, membership, and leadership.

use crate::directory::{
    domain::{DirectoryDomainError, Team, TeamId, UserId, UserProfile},
    ports::{DirectoryStoreError, TeamStore, UserStore},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),

    /// The referenced team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The user already belongs to a different team.
    #[error("user {user} already belongs to team {team}")]
    AlreadyInAnotherTeam {
        /// The user whose move was rejected.
        user: UserId,
        /// The team the user currently belongs to.
        team: TeamId,
    },

    /// The user is not a member of the team.
    #[error("user {user} is not a member of team {team}")]
    NotAMember {
        /// The user whose removal was rejected.
        user: UserId,
        /// The team whose roster was checked.
        team: TeamId,
    },

    /// Another team already uses the requested name.
    #[error("team name already exists: {0}")]
    NameConflict(String),

    /// Store operation failed.
    #[error(transparent)]
    Store(DirectoryStoreError),
}

impl From<DirectoryStoreError> for RosterError {
    fn from(err: DirectoryStoreError) -> Self {
        match err {
            DirectoryStoreError::DuplicateTeamName(name) => Self::NameConflict(name),
            DirectoryStoreError::UserNotFound(id) => Self::UserNotFound(id),
            DirectoryStoreError::TeamNotFound(id) => Self::TeamNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Result type for roster service operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Orchestrates team records and the membership links mirrored on users.
#[derive(Clone)]
pub struct TeamRosterService<T, U, C>
where
    T: TeamStore,
    U: UserStore,
    C: Clock + Send + Sync,
{
    teams: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<T, U, C> TeamRosterService<T, U, C>
where
    T: TeamStore,
    U: UserStore,
    C: Clock + Send + Sync,
{
    /// Creates a new roster service.
    #[must_use]
    pub const fn new(teams: Arc<T>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self { teams, users, clock }
    }

    /// Creates a team with a unique, non-empty name.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Domain`] for an empty name and
    /// [`RosterError::NameConflict`] when the name is taken.
    pub async fn create_team(
        &self,
        name: impl Into<String> + Send,
        description: impl Into<String> + Send,
    ) -> RosterResult<Team> {
        let team = Team::new(name, description, &*self.clock)?;
        self.teams.insert(&team).await?;
        info!(team = %team.id(), name = team.name(), "team created");
        Ok(team)
    }

    /// Renames a team and/or replaces its description.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::TeamNotFound`] for unknown teams,
    /// [`RosterError::Domain`] for an empty name, and
    /// [`RosterError::NameConflict`] when a rename collides.
    pub async fn update_team(
        &self,
        team_id: TeamId,
        name: Option<String>,
        description: Option<String>,
    ) -> RosterResult<Team> {
        let mut team = self.load_team(team_id).await?;
        if let Some(new_name) = name {
            team.rename(new_name, &*self.clock)?;
        }
        if let Some(new_description) = description {
            team.set_description(new_description, &*self.clock);
        }
        self.teams.update(&team).await?;
        Ok(team)
    }

    /// Deletes a team and clears the team reference of every member.
    ///
    /// Succeeds for teams with zero members.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::TeamNotFound`] for unknown teams.
    pub async fn delete_team(&self, team_id: TeamId) -> RosterResult<()> {
        let team = self.load_team(team_id).await?;
        self.teams.delete(team_id).await?;

        let members = self.users.find_by_team(team_id).await?;
        for member in &members {
            self.users.set_team(member.id(), None).await?;
        }
        info!(
            team = %team_id,
            name = team.name(),
            unassigned = members.len(),
            "team deleted"
        );
        Ok(())
    }

    /// Adds a user to a team, updating both the roster and the user record.
    ///
    /// Re-adding a current member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::AlreadyInAnotherTeam`] when the user belongs
    /// to a different team, and not-found errors for unknown ids.
    pub async fn add_member(&self, team_id: TeamId, user_id: UserId) -> RosterResult<Team> {
        let mut team = self.load_team(team_id).await?;
        let user = self.load_user(user_id).await?;

        match user.team_id() {
            Some(current) if current != team_id => {
                return Err(RosterError::AlreadyInAnotherTeam {
                    user: user_id,
                    team: current,
                });
            }
            Some(_) if team.has_member(user_id) => return Ok(team),
            _ => {}
        }

        team.add_member(user_id, &*self.clock);
        self.teams.update(&team).await?;
        self.users.set_team(user_id, Some(team_id)).await?;
        Ok(team)
    }

    /// Removes a user from a team, vacating leadership when needed.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotAMember`] when the user does not belong to
    /// the team.
    pub async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> RosterResult<Team> {
        let mut team = self.load_team(team_id).await?;
        let user = self.load_user(user_id).await?;

        if user.team_id() != Some(team_id) {
            return Err(RosterError::NotAMember {
                user: user_id,
                team: team_id,
            });
        }

        team.remove_member(user_id, &*self.clock);
        self.teams.update(&team).await?;
        self.users.set_team(user_id, None).await?;
        Ok(team)
    }

    /// Sets or clears the team leader; a leader must be a current member.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Domain`] when the proposed leader is not on
    /// the roster.
    pub async fn set_leader(
        &self,
        team_id: TeamId,
        leader_id: Option<UserId>,
    ) -> RosterResult<Team> {
        let mut team = self.load_team(team_id).await?;
        if let Some(user_id) = leader_id {
            self.load_user(user_id).await?;
        }
        team.set_leader(leader_id, &*self.clock)?;
        self.teams.update(&team).await?;
        Ok(team)
    }

    /// Returns the members of a team sorted by username.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::TeamNotFound`] for unknown teams.
    pub async fn members(&self, team_id: TeamId) -> RosterResult<Vec<UserProfile>> {
        self.load_team(team_id).await?;
        Ok(self.users.find_by_team(team_id).await?)
    }

    async fn load_team(&self, team_id: TeamId) -> RosterResult<Team> {
        self.teams
            .find_by_id(team_id)
            .await?
            .ok_or(RosterError::TeamNotFound(team_id))
    }

    async fn load_user(&self, user_id: UserId) -> RosterResult<UserProfile> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(RosterError::UserNotFound(user_id))
    }
}

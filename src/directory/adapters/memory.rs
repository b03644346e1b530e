//! In-memory directory stores for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{Role, Team, TeamId, UserId, UserProfile},
    ports::{DirectoryStoreError, DirectoryStoreResult, TeamStore, UserStore},
};

/// Thread-safe in-memory user and team directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, UserProfile>,
    teams: HashMap<TeamId, Team>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user projection, replacing any existing record with the id.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the directory lock is poisoned.
    pub fn seed_user(&self, profile: UserProfile) -> DirectoryStoreResult<()> {
        let mut state = write_state(&self.state)?;
        state.users.insert(profile.id(), profile);
        Ok(())
    }

    /// Seeds a team record, replacing any existing record with the id.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the directory lock is poisoned.
    pub fn seed_team(&self, team: Team) -> DirectoryStoreResult<()> {
        let mut state = write_state(&self.state)?;
        state.teams.insert(team.id(), team);
        Ok(())
    }
}

fn write_state(
    state: &Arc<RwLock<DirectoryState>>,
) -> DirectoryStoreResult<std::sync::RwLockWriteGuard<'_, DirectoryState>> {
    state
        .write()
        .map_err(|err| DirectoryStoreError::persistence(std::io::Error::other(err.to_string())))
}

fn read_state(
    state: &Arc<RwLock<DirectoryState>>,
) -> DirectoryStoreResult<std::sync::RwLockReadGuard<'_, DirectoryState>> {
    state
        .read()
        .map_err(|err| DirectoryStoreError::persistence(std::io::Error::other(err.to_string())))
}

#[async_trait]
impl UserStore for InMemoryDirectory {
    async fn find_by_id(&self, id: UserId) -> DirectoryStoreResult<Option<UserProfile>> {
        let state = read_state(&self.state)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_roles(&self, roles: &[Role]) -> DirectoryStoreResult<Vec<UserProfile>> {
        let state = read_state(&self.state)?;
        let mut matches: Vec<UserProfile> = state
            .users
            .values()
            .filter(|profile| roles.contains(&profile.role()))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.username().cmp(b.username()));
        Ok(matches)
    }

    async fn find_by_team(&self, team_id: TeamId) -> DirectoryStoreResult<Vec<UserProfile>> {
        let state = read_state(&self.state)?;
        let mut members: Vec<UserProfile> = state
            .users
            .values()
            .filter(|profile| profile.team_id() == Some(team_id))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.username().cmp(b.username()));
        Ok(members)
    }

    async fn set_team(&self, id: UserId, team_id: Option<TeamId>) -> DirectoryStoreResult<()> {
        let mut state = write_state(&self.state)?;
        let profile = state
            .users
            .get(&id)
            .ok_or(DirectoryStoreError::UserNotFound(id))?;

        let mut updated = UserProfile::new(
            profile.id(),
            profile.username(),
            profile.display_name(),
            profile.role(),
        );
        if let Some(email) = profile.email() {
            updated = updated.with_email(email);
        }
        if let Some(team) = team_id {
            updated = updated.with_team(team);
        }
        state.users.insert(id, updated);
        Ok(())
    }
}

#[async_trait]
impl TeamStore for InMemoryDirectory {
    async fn insert(&self, team: &Team) -> DirectoryStoreResult<()> {
        let mut state = write_state(&self.state)?;
        let name_taken = state
            .teams
            .values()
            .any(|existing| existing.id() != team.id() && existing.name() == team.name());
        if name_taken {
            return Err(DirectoryStoreError::DuplicateTeamName(
                team.name().to_owned(),
            ));
        }
        state.teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn update(&self, team: &Team) -> DirectoryStoreResult<()> {
        let mut state = write_state(&self.state)?;
        if !state.teams.contains_key(&team.id()) {
            return Err(DirectoryStoreError::TeamNotFound(team.id()));
        }
        let name_taken = state
            .teams
            .values()
            .any(|existing| existing.id() != team.id() && existing.name() == team.name());
        if name_taken {
            return Err(DirectoryStoreError::DuplicateTeamName(
                team.name().to_owned(),
            ));
        }
        state.teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn delete(&self, id: TeamId) -> DirectoryStoreResult<()> {
        let mut state = write_state(&self.state)?;
        state
            .teams
            .remove(&id)
            .map(|_| ())
            .ok_or(DirectoryStoreError::TeamNotFound(id))
    }

    async fn find_by_id(&self, id: TeamId) -> DirectoryStoreResult<Option<Team>> {
        let state = read_state(&self.state)?;
        Ok(state.teams.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DirectoryStoreResult<Option<Team>> {
        let state = read_state(&self.state)?;
        Ok(state
            .teams
            .values()
            .find(|team| team.name() == name)
            .cloned())
    }

    async fn list(&self) -> DirectoryStoreResult<Vec<Team>> {
        let state = read_state(&self.state)?;
        let mut teams: Vec<Team> = state.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(teams)
    }
}

//! Team aggregate with roster invariants.

use super::{DirectoryDomainError, TeamId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A team of users with an optional leader drawn from its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: String,
    description: String,
    leader_id: Option<UserId>,
    members: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTeamData {
    /// Persisted team identifier.
    pub id: TeamId,
    /// Persisted unique name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted leader, if any.
    pub leader_id: Option<UserId>,
    /// Persisted member set.
    pub members: BTreeSet<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new empty team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyTeamName`] when the name is
    /// empty after trimming.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, DirectoryDomainError> {
        let validated = validate_name(name.into())?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TeamId::new(),
            name: validated,
            description: description.into(),
            leader_id: None,
            members: BTreeSet::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a team from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTeamData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            leader_id: data.leader_id,
            members: data.members,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the unique team name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current leader, if any.
    #[must_use]
    pub const fn leader_id(&self) -> Option<UserId> {
        self.leader_id
    }

    /// Returns the member set.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<UserId> {
        &self.members
    }

    /// Returns `true` when the user is on the roster.
    #[must_use]
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
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

    /// Renames the team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyTeamName`] when the new name is
    /// empty after trimming.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), DirectoryDomainError> {
        let validated = validate_name(name.into())?;
        self.name = validated;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>, clock: &impl Clock) {
        self.description = description.into();
        self.touch(clock);
    }

    /// Adds a user to the roster. Adding an existing member is a no-op.
    pub fn add_member(&mut self, user_id: UserId, clock: &impl Clock) {
        if self.members.insert(user_id) {
            self.touch(clock);
        }
    }

    /// Removes a user from the roster.
    ///
    /// Leadership becomes vacant when the departing member was the leader.
    pub fn remove_member(&mut self, user_id: UserId, clock: &impl Clock) {
        if self.members.remove(&user_id) {
            if self.leader_id == Some(user_id) {
                self.leader_id = None;
            }
            self.touch(clock);
        }
    }

    /// Sets or clears the team leader.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::LeaderNotAMember`] when the proposed
    /// leader is not on the roster.
    pub fn set_leader(
        &mut self,
        leader_id: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<(), DirectoryDomainError> {
        if let Some(user_id) = leader_id {
            if !self.has_member(user_id) {
                return Err(DirectoryDomainError::LeaderNotAMember {
                    user: user_id,
                    team: self.id,
                });
            }
        }
        self.leader_id = leader_id;
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_name(raw: String) -> Result<String, DirectoryDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DirectoryDomainError::EmptyTeamName);
    }
    Ok(trimmed.to_owned())
}

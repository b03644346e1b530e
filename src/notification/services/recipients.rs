//! Shared audience resolution for dispatch fan-out.
//!
//! Every fan-out in the system (assignment, approval outcomes, reminders,
//! emails) resolves "who" through this one routine so the in-app and email
//! paths can never diverge.

use crate::directory::{
    domain::{Role, UserProfile},
    ports::{DirectoryStoreResult, UserStore},
};
use crate::task::domain::TaskOwner;
use std::sync::Arc;

/// Resolves the recipient set for a task-scoped notification.
pub struct RecipientResolver<U>
where
    U: UserStore,
{
    users: Arc<U>,
}

// Manual impl: a derive would demand `U: Clone` even though only the `Arc`
// is cloned.
impl<U> Clone for RecipientResolver<U>
where
    U: UserStore,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U> RecipientResolver<U>
where
    U: UserStore,
{
    /// Creates a resolver over the given user store.
    #[must_use]
    pub const fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Resolves the audience of a task: its direct assignee when present,
    /// the owning team's roster otherwise, and nobody for unowned tasks.
    ///
    /// An assignee or team reference that no longer resolves yields an
    /// empty audience rather than an error; callers decide whether that is
    /// an anomaly worth logging.
    ///
    /// # Errors
    ///
    /// Returns a store error only for lookup failures, never for missing
    /// records.
    pub async fn task_audience(&self, owner: TaskOwner) -> DirectoryStoreResult<Vec<UserProfile>> {
        match owner {
            TaskOwner::User { id } => {
                let profile = self.users.find_by_id(id).await?;
                Ok(profile.into_iter().collect())
            }
            TaskOwner::Team { id } => self.users.find_by_team(id).await,
            TaskOwner::Unowned => Ok(Vec::new()),
        }
    }

    /// Resolves every Admin and Manager, the approval-request audience.
    ///
    /// # Errors
    ///
    /// Returns a store error for lookup failures.
    pub async fn privileged_users(&self) -> DirectoryStoreResult<Vec<UserProfile>> {
        self.users.find_by_roles(&Role::PRIVILEGED).await
    }
}

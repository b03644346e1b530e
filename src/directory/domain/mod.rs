//! Domain model for the identity and team directory.
//!
//! Users are owned by the external identity collaborator; the directory
//! domain carries their read-side projection plus the team aggregate whose
//! roster invariants this crate maintains.

mod error;
mod ids;
mod role;
mod team;
mod user;

pub use error::{DirectoryDomainError, ParseRoleError};
pub use ids::{TeamId, UserId};
pub use role::Role;
pub use team::{PersistedTeamData, Team};
pub use user::{UserDisplay, UserProfile};

//! Application services for directory maintenance.

mod roster;

pub use roster::{RosterError, RosterResult, TeamRosterService};

//! Identity and team directory.
//!
//! The directory is the crate's view of the external identity collaborator:
//! read-side user projections (id, role, team reference, email, display
//! name) plus the team aggregate and the roster invariants this crate
//! maintains: a user belongs to at most one team, and a team leader must
//! be drawn from the team's members. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

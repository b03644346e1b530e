//! Task lifecycle engine.
//!
//! Implements role-gated task mutation and the completion-approval state
//! machine: privileged actors (Admin/Manager) may edit any field and their
//! completions take effect immediately, while members may submit exactly
//! the status of a task they own, with completions parked in a
//! pending-approval state until a privileged actor confirms or rejects
//! them. Status transitions are planned by a pure function that also yields
//! the notification events the transition implies. The module follows
//! hexagonal architecture:
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

//! Notification dispatch and inbox querying.
//!
//! Producers describe "who must hear about what" as
//! [`domain::NotificationIntent`] values and hand them to an intent queue;
//! a background worker dispatches every intent independently: persisted
//! record first, then best-effort realtime push and email. The inbox
//! service is the read-and-maintain surface owned by each recipient. The
//! module follows hexagonal architecture:
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

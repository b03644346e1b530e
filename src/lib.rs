//! Gantt: task and team management backend core.
//!
//! This crate provides the reviewed core of a task/team management backend:
//! the role-gated task lifecycle engine with its completion-approval
//! workflow, the notification dispatch pipeline (in-app records plus
//! best-effort push and email), and the daily reminder scheduler.
//!
//! # Architecture
//!
//! Gantt follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, SMTP, etc.)
//!
//! # Modules
//!
//! - [`directory`]: Identity/team read-side and roster maintenance
//! - [`task`]: Task lifecycle engine and approval state machine
//! - [`notification`]: Intent queue, dispatch worker, and inbox queries
//! - [`scheduler`]: Due-soon/overdue reminder job

pub mod directory;
pub mod notification;
pub mod scheduler;
pub mod task;

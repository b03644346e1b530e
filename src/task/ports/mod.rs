//! Port contracts for the task lifecycle engine.

pub mod repository;

pub use repository::{
    ReminderScan, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};

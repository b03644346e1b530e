//! Port contracts for notification dispatch and querying.

pub mod email;
pub mod gateway;
pub mod push;
pub mod repository;

pub use email::{EmailError, EmailSender};
pub use gateway::NotificationGateway;
pub use push::{NoopPush, RealtimePush};
pub use repository::{
    NotificationPage, NotificationQuery, NotificationRepository, NotificationRepositoryError,
    NotificationRepositoryResult,
};

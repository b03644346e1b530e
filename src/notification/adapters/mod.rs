//! Adapter implementations for the notification ports.

pub mod memory;
pub mod postgres;
pub mod smtp;

pub use memory::{
    BroadcastPush, CollectingGateway, InMemoryNotificationRepository, RecordingEmailSender,
    SentEmail,
};
pub use postgres::{NotificationPgPool, PostgresNotificationRepository};
pub use smtp::{SmtpConfig, SmtpEmailSender};

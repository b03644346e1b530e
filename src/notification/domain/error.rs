//! Error types for notification domain parsing.

use thiserror::Error;

/// Error returned while parsing notification types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification type: {0}")]
pub struct ParseNotificationTypeError(pub String);

/// Error returned while parsing notification statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification status: {0}")]
pub struct ParseNotificationStatusError(pub String);

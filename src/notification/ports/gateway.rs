//! Gateway port through which producers hand intents to the dispatch
//! worker.

use crate::notification::domain::NotificationIntent;

/// Non-blocking entry point to the dispatch pipeline.
///
/// Enqueueing never fails the caller: the mutation that produced the
/// intents has already committed, and notification delivery is strictly
/// best-effort after that point.
pub trait NotificationGateway: Send + Sync {
    /// Queues intents for background dispatch.
    fn enqueue(&self, intents: Vec<NotificationIntent>);
}

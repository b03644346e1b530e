//! Application services for notification dispatch and querying.

mod dispatcher;
mod inbox;
mod queue;
mod recipients;
mod templates;

pub use dispatcher::{DispatchOutcome, NotificationDispatcher};
pub use inbox::{InboxEntry, InboxError, InboxPage, InboxResult, NotificationInbox, TaskSummary};
pub use queue::{DispatchSummary, DispatchWorker, IntentQueue, dispatch_pipeline};
pub use recipients::RecipientResolver;
pub use templates::{TemplateError, render_notification_email};

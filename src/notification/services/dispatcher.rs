//! Single-recipient dispatch primitive.

use crate::directory::ports::UserStore;
use crate::notification::domain::{Notification, NotificationIntent};
use crate::notification::ports::{EmailSender, NotificationRepository, RealtimePush};
use crate::notification::services::templates::render_notification_email;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// What happened to one intent.
///
/// Dispatch never escalates: every failure mode is folded into the outcome
/// and logged, because the mutation that produced the intent has already
/// succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The in-app record was persisted.
    pub stored: bool,
    /// An email was handed to the transport.
    pub emailed: bool,
}

/// Persists one notification, pushes it to the recipient's live session,
/// and optionally emails the recipient.
#[derive(Clone)]
pub struct NotificationDispatcher<R, E, P, U, C>
where
    R: NotificationRepository,
    E: EmailSender,
    P: RealtimePush,
    U: UserStore,
    C: Clock + Send + Sync,
{
    notifications: Arc<R>,
    email: Arc<E>,
    push: Arc<P>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<R, E, P, U, C> NotificationDispatcher<R, E, P, U, C>
where
    R: NotificationRepository,
    E: EmailSender,
    P: RealtimePush,
    U: UserStore,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new(
        notifications: Arc<R>,
        email: Arc<E>,
        push: Arc<P>,
        users: Arc<U>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            notifications,
            email,
            push,
            users,
            clock,
        }
    }

    /// Dispatches one intent to one recipient.
    ///
    /// The in-app record is the primary effect; push and email are side
    /// channels whose failures never roll it back.
    pub async fn dispatch(&self, intent: &NotificationIntent) -> DispatchOutcome {
        let notification = Notification::new(
            intent.recipient(),
            intent.task_id(),
            intent.kind(),
            intent.message(),
            intent.link().map(str::to_owned),
            &*self.clock,
        );

        let stored = match self.notifications.insert(&notification).await {
            Ok(()) => {
                debug!(
                    recipient = %intent.recipient(),
                    kind = intent.kind().as_str(),
                    "notification stored"
                );
                true
            }
            Err(err) => {
                warn!(
                    recipient = %intent.recipient(),
                    kind = intent.kind().as_str(),
                    error = %err,
                    "failed to store notification"
                );
                false
            }
        };

        if stored {
            self.push.push(&notification);
        }

        let mut emailed = false;
        if let Some(subject) = intent.email_subject() {
            emailed = self.send_email(intent, subject).await;
        }

        DispatchOutcome { stored, emailed }
    }

    async fn send_email(&self, intent: &NotificationIntent, subject: &str) -> bool {
        let profile = match self.users.find_by_id(intent.recipient()).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(recipient = %intent.recipient(), "email skipped: recipient not found");
                return false;
            }
            Err(err) => {
                warn!(recipient = %intent.recipient(), error = %err, "email skipped: lookup failed");
                return false;
            }
        };

        let Some(address) = profile.email() else {
            debug!(recipient = %intent.recipient(), "email skipped: no address on file");
            return false;
        };

        let body = match render_notification_email(
            profile.display_name(),
            intent.message(),
            intent.link(),
        ) {
            Ok(body) => body,
            Err(err) => {
                warn!(recipient = %intent.recipient(), error = %err, "email body render failed");
                return false;
            }
        };

        match self.email.send(address, subject, &body).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    recipient = %intent.recipient(),
                    error = %err,
                    "email transport failed"
                );
                false
            }
        }
    }
}

//! In-memory notification adapters for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::directory::domain::UserId;
use crate::notification::{
    domain::{Notification, NotificationId, NotificationIntent},
    ports::{
        EmailError, EmailSender, NotificationGateway, NotificationPage, NotificationQuery,
        NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult,
        RealtimePush,
    },
};

/// Thread-safe in-memory notification repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRepository {
    state: Arc<RwLock<HashMap<NotificationId, Notification>>>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> NotificationRepositoryError {
    NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(notification.id(), notification.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_for_user(
        &self,
        recipient: UserId,
        query: NotificationQuery,
    ) -> NotificationRepositoryResult<NotificationPage> {
        let normalized = query.normalized();
        let state = self.state.read().map_err(lock_error)?;

        let mut matching: Vec<Notification> = state
            .values()
            .filter(|notification| notification.recipient() == recipient)
            .filter(|notification| {
                normalized
                    .status
                    .is_none_or(|status| notification.status() == status)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let items = matching
            .into_iter()
            .skip(usize::try_from(normalized.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(normalized.limit).unwrap_or(usize::MAX))
            .collect();

        Ok(NotificationPage { items, total })
    }

    async fn update(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.contains_key(&notification.id()) {
            return Err(NotificationRepositoryError::NotFound(notification.id()));
        }
        state.insert(notification.id(), notification.clone());
        Ok(())
    }

    async fn delete(&self, id: NotificationId) -> NotificationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(NotificationRepositoryError::NotFound(id))
    }
}

/// One message captured by [`RecordingEmailSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Email sender that records messages instead of delivering them.
///
/// `fail_to` addresses simulate transport failures for isolation tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail_to: Arc<Mutex<Vec<String>>>,
}

impl RecordingEmailSender {
    /// Creates a recorder that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send to `address` fail with a transport error.
    pub fn fail_for(&self, address: impl Into<String>) {
        if let Ok(mut fail_to) = self.fail_to.lock() {
            fail_to.push(address.into());
        }
    }

    /// Returns the messages captured so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let should_fail = self
            .fail_to
            .lock()
            .map(|fail_to| fail_to.iter().any(|address| address == to))
            .unwrap_or(false);
        if should_fail {
            return Err(EmailError::transport(std::io::Error::other(format!(
                "simulated transport failure for {to}"
            ))));
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|err| EmailError::transport(std::io::Error::other(err.to_string())))?;
        sent.push(SentEmail {
            to: to.to_owned(),
            subject: subject.to_owned(),
            body: body.to_owned(),
        });
        Ok(())
    }
}

/// Gateway that captures intents instead of queueing them.
///
/// Lets embedders and tests inspect exactly what a producer fanned out
/// without running a dispatch worker.
#[derive(Debug, Clone, Default)]
pub struct CollectingGateway {
    intents: Arc<Mutex<Vec<NotificationIntent>>>,
}

impl CollectingGateway {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every intent enqueued so far.
    #[must_use]
    pub fn collected(&self) -> Vec<NotificationIntent> {
        self.intents
            .lock()
            .map(|intents| intents.clone())
            .unwrap_or_default()
    }

    /// Removes and returns every intent enqueued so far.
    #[must_use]
    pub fn take(&self) -> Vec<NotificationIntent> {
        self.intents
            .lock()
            .map(|mut intents| std::mem::take(&mut *intents))
            .unwrap_or_default()
    }
}

impl NotificationGateway for CollectingGateway {
    fn enqueue(&self, intents: Vec<NotificationIntent>) {
        if let Ok(mut collected) = self.intents.lock() {
            collected.extend(intents);
        }
    }
}

/// Push adapter backed by a tokio broadcast channel.
///
/// Session handlers subscribe; pushes to a channel with no subscribers are
/// silently dropped, matching the best-effort contract.
#[derive(Debug, Clone)]
pub struct BroadcastPush {
    tx: tokio::sync::broadcast::Sender<Notification>,
}

impl BroadcastPush {
    /// Creates a push channel with the given buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = tokio::sync::broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribes to pushed notifications.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl RealtimePush for BroadcastPush {
    fn push(&self, notification: &Notification) {
        // A send error only means nobody is listening right now.
        drop(self.tx.send(notification.clone()));
    }
}

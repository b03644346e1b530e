//! Intent queue and the background dispatch worker.
//!
//! Producers (the lifecycle engine, the scheduler) enqueue intents and move
//! on; the worker drains the queue and dispatches every intent with
//! per-item isolation, so one recipient's failure never suppresses the
//! rest.

use crate::directory::ports::UserStore;
use crate::notification::domain::NotificationIntent;
use crate::notification::ports::{
    EmailSender, NotificationGateway, NotificationRepository, RealtimePush,
};
use crate::notification::services::dispatcher::NotificationDispatcher;
use futures::future::join_all;
use mockable::Clock;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Sending half of the dispatch pipeline, handed to producers.
#[derive(Debug, Clone)]
pub struct IntentQueue {
    tx: mpsc::UnboundedSender<NotificationIntent>,
}

impl NotificationGateway for IntentQueue {
    fn enqueue(&self, intents: Vec<NotificationIntent>) {
        for intent in intents {
            if self.tx.send(intent).is_err() {
                warn!("dispatch worker is gone; dropping notification intent");
            }
        }
    }
}

/// Aggregate result of one worker batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Intents taken off the queue.
    pub attempted: usize,
    /// In-app records persisted.
    pub stored: usize,
    /// Emails handed to the transport.
    pub emailed: usize,
}

/// Consumes the intent queue and performs dispatch.
pub struct DispatchWorker<R, E, P, U, C>
where
    R: NotificationRepository,
    E: EmailSender,
    P: RealtimePush,
    U: UserStore,
    C: Clock + Send + Sync,
{
    rx: mpsc::UnboundedReceiver<NotificationIntent>,
    dispatcher: NotificationDispatcher<R, E, P, U, C>,
}

/// Creates a connected queue/worker pair around the given dispatcher.
#[must_use]
pub fn dispatch_pipeline<R, E, P, U, C>(
    dispatcher: NotificationDispatcher<R, E, P, U, C>,
) -> (IntentQueue, DispatchWorker<R, E, P, U, C>)
where
    R: NotificationRepository,
    E: EmailSender,
    P: RealtimePush,
    U: UserStore,
    C: Clock + Send + Sync,
{
    let (tx, rx) = mpsc::unbounded_channel();
    (IntentQueue { tx }, DispatchWorker { rx, dispatcher })
}

impl<R, E, P, U, C> DispatchWorker<R, E, P, U, C>
where
    R: NotificationRepository,
    E: EmailSender,
    P: RealtimePush,
    U: UserStore,
    C: Clock + Send + Sync,
{
    /// Dispatches everything currently in the queue and returns a summary.
    ///
    /// Intents are dispatched concurrently; individual failures are logged
    /// by the dispatcher and reflected only in the summary counts.
    pub async fn drain(&mut self) -> DispatchSummary {
        let mut batch = Vec::new();
        while let Ok(intent) = self.rx.try_recv() {
            batch.push(intent);
        }
        self.dispatch_batch(&batch).await
    }

    /// Runs until every queue sender is dropped.
    pub async fn run(mut self) {
        while let Some(first) = self.rx.recv().await {
            let mut batch = vec![first];
            while let Ok(intent) = self.rx.try_recv() {
                batch.push(intent);
            }
            let summary = self.dispatch_batch(&batch).await;
            info!(
                attempted = summary.attempted,
                stored = summary.stored,
                emailed = summary.emailed,
                "dispatch batch settled"
            );
        }
    }

    async fn dispatch_batch(&self, batch: &[NotificationIntent]) -> DispatchSummary {
        let attempted = batch.len();
        let outcomes = join_all(
            batch
                .iter()
                .map(|intent| self.dispatcher.dispatch(intent)),
        )
        .await;

        let mut summary = DispatchSummary {
            attempted,
            ..DispatchSummary::default()
        };
        for outcome in outcomes {
            if outcome.stored {
                summary.stored += 1;
            }
            if outcome.emailed {
                summary.emailed += 1;
            }
        }
        summary
    }
}

//! Tests for the single-recipient dispatch primitive.

use std::sync::Arc;

use crate::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{Role, TeamId, UserId, UserProfile},
    ports::{DirectoryStoreError, DirectoryStoreResult, UserStore},
};
use crate::notification::{
    adapters::memory::{
        BroadcastPush, InMemoryNotificationRepository, RecordingEmailSender,
    },
    domain::{NotificationIntent, NotificationStatus, NotificationType},
    ports::{NoopPush, NotificationQuery, NotificationRepository},
    services::NotificationDispatcher,
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;
use rstest::rstest;

mock! {
    UserDir {}

    #[async_trait]
    impl UserStore for UserDir {
        async fn find_by_id(&self, id: UserId) -> DirectoryStoreResult<Option<UserProfile>>;
        async fn find_by_roles(&self, roles: &[Role]) -> DirectoryStoreResult<Vec<UserProfile>>;
        async fn find_by_team(&self, team_id: TeamId) -> DirectoryStoreResult<Vec<UserProfile>>;
        async fn set_team(&self, id: UserId, team_id: Option<TeamId>) -> DirectoryStoreResult<()>;
    }
}

struct Harness {
    dispatcher: NotificationDispatcher<
        InMemoryNotificationRepository,
        RecordingEmailSender,
        NoopPush,
        InMemoryDirectory,
        DefaultClock,
    >,
    notifications: Arc<InMemoryNotificationRepository>,
    email: Arc<RecordingEmailSender>,
    recipient: UserId,
}

fn harness_with(profile: Option<UserProfile>) -> Harness {
    let directory = Arc::new(InMemoryDirectory::new());
    let recipient = profile.as_ref().map_or_else(UserId::new, UserProfile::id);
    if let Some(seeded) = profile {
        directory.seed_user(seeded).expect("seed recipient");
    }

    let notifications = Arc::new(InMemoryNotificationRepository::new());
    let email = Arc::new(RecordingEmailSender::new());
    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&notifications),
        Arc::clone(&email),
        Arc::new(NoopPush),
        directory,
        Arc::new(DefaultClock),
    );

    Harness {
        dispatcher,
        notifications,
        email,
        recipient,
    }
}

fn emailed_recipient() -> UserProfile {
    UserProfile::new(UserId::new(), "wen", "Wen Worker", Role::User)
        .with_email("wen@example.test")
}

fn intent(recipient: UserId) -> NotificationIntent {
    NotificationIntent::new(
        recipient,
        TaskId::new(),
        NotificationType::TaskAssigned,
        "You have been assigned a task: Ship release notes",
    )
    .with_link("/task/some-task")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_persists_an_unread_record() {
    let harness = harness_with(Some(emailed_recipient()));

    let outcome = harness.dispatcher.dispatch(&intent(harness.recipient)).await;

    assert!(outcome.stored);
    let page = harness
        .notifications
        .list_for_user(harness.recipient, NotificationQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(page.total, 1);
    let stored = page.items.first().expect("one record");
    assert_eq!(stored.status(), NotificationStatus::Unread);
    assert_eq!(stored.kind(), NotificationType::TaskAssigned);
    assert_eq!(stored.link(), Some("/task/some-task"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_emails_when_requested_and_address_is_on_file() {
    let harness = harness_with(Some(emailed_recipient()));

    let outcome = harness
        .dispatcher
        .dispatch(&intent(harness.recipient).with_email("New task assigned"))
        .await;

    assert!(outcome.stored);
    assert!(outcome.emailed);
    let sent = harness.email.sent();
    assert_eq!(sent.len(), 1);
    let message = sent.first().expect("one email");
    assert_eq!(message.to, "wen@example.test");
    assert_eq!(message.subject, "New task assigned");
    assert!(message.body.contains("Wen Worker"));
    assert!(
        message
            .body
            .contains("You have been assigned a task: Ship release notes")
    );
    assert!(message.body.contains("/task/some-task"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_without_email_request_sends_nothing() {
    let harness = harness_with(Some(emailed_recipient()));

    let outcome = harness.dispatcher.dispatch(&intent(harness.recipient)).await;

    assert!(outcome.stored);
    assert!(!outcome.emailed);
    assert!(harness.email.sent().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_address_skips_email_but_keeps_the_record() {
    let profile = UserProfile::new(UserId::new(), "mo", "Mo Mate", Role::User);
    let harness = harness_with(Some(profile));

    let outcome = harness
        .dispatcher
        .dispatch(&intent(harness.recipient).with_email("New task assigned"))
        .await;

    assert!(outcome.stored);
    assert!(!outcome.emailed);
    assert!(harness.email.sent().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_failure_never_rolls_back_the_record() {
    let harness = harness_with(Some(emailed_recipient()));
    harness.email.fail_for("wen@example.test");

    let outcome = harness
        .dispatcher
        .dispatch(&intent(harness.recipient).with_email("New task assigned"))
        .await;

    assert!(outcome.stored);
    assert!(!outcome.emailed);
    let page = harness
        .notifications
        .list_for_user(harness.recipient, NotificationQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(page.total, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recipient_lookup_failure_degrades_to_in_app_only() {
    let mut users = MockUserDir::new();
    users.expect_find_by_id().returning(|id| {
        Err(DirectoryStoreError::persistence(std::io::Error::other(
            format!("directory offline for {id}"),
        )))
    });

    let notifications = Arc::new(InMemoryNotificationRepository::new());
    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&notifications),
        Arc::new(RecordingEmailSender::new()),
        Arc::new(NoopPush),
        Arc::new(users),
        Arc::new(DefaultClock),
    );

    let recipient = UserId::new();
    let outcome = dispatcher
        .dispatch(&intent(recipient).with_email("New task assigned"))
        .await;

    assert!(outcome.stored);
    assert!(!outcome.emailed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_notifications_reach_live_subscribers() {
    let directory = Arc::new(InMemoryDirectory::new());
    let profile = emailed_recipient();
    let recipient = profile.id();
    directory.seed_user(profile).expect("seed recipient");

    let push = Arc::new(BroadcastPush::new(8));
    let mut session = push.subscribe();
    let dispatcher = NotificationDispatcher::new(
        Arc::new(InMemoryNotificationRepository::new()),
        Arc::new(RecordingEmailSender::new()),
        push,
        directory,
        Arc::new(DefaultClock),
    );

    dispatcher.dispatch(&intent(recipient)).await;

    let pushed = session.try_recv().expect("one pushed notification");
    assert_eq!(pushed.recipient(), recipient);
    assert_eq!(pushed.kind(), NotificationType::TaskAssigned);
}

//! Shared harness for in-memory pipeline integration tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use gantt::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{Role, Team, TeamId, UserId, UserProfile},
};
use gantt::notification::{
    adapters::memory::{InMemoryNotificationRepository, RecordingEmailSender},
    ports::NoopPush,
    services::{DispatchWorker, IntentQueue, NotificationDispatcher, NotificationInbox,
        dispatch_pipeline},
};
use gantt::scheduler::{ReminderConfig, ReminderScheduler};
use gantt::task::{
    adapters::memory::InMemoryTaskRepository, domain::Actor, services::TaskLifecycleService,
};
use mockable::Clock;
use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    drop(
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init(),
    );
});

/// Clock pinned to a single instant for deterministic scheduler windows.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 10:00 in Bangkok on 2025-06-02, the reference "now" for every test.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 3, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryDirectory,
    InMemoryDirectory,
    IntentQueue,
    FixedClock,
>;

pub type TestWorker = DispatchWorker<
    InMemoryNotificationRepository,
    RecordingEmailSender,
    NoopPush,
    InMemoryDirectory,
    FixedClock,
>;

pub type TestInbox = NotificationInbox<InMemoryNotificationRepository, InMemoryTaskRepository>;

pub type TestScheduler =
    ReminderScheduler<InMemoryTaskRepository, InMemoryDirectory, IntentQueue, FixedClock>;

/// Fully wired in-memory stack.
pub struct TestEnv {
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub email: Arc<RecordingEmailSender>,
    pub service: TestService,
    pub worker: TestWorker,
    pub scheduler: TestScheduler,
    pub inbox: TestInbox,
    pub admin: Actor,
    pub manager: Actor,
    pub member: Actor,
    pub mate: Actor,
    pub team_id: TeamId,
}

/// Builds the full pipeline with one team of two members plus an admin and
/// a manager, all with email addresses on file.
pub fn env() -> TestEnv {
    Lazy::force(&TRACING);

    let directory = Arc::new(InMemoryDirectory::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());
    let email = Arc::new(RecordingEmailSender::new());

    let team = Team::new("Platform", "Platform crew", &FixedClock(now())).expect("valid team");
    let team_id = team.id();

    let admin_id = UserId::new();
    let manager_id = UserId::new();
    let member_id = UserId::new();
    let mate_id = UserId::new();

    directory
        .seed_user(
            UserProfile::new(admin_id, "ada", "Ada Admin", Role::Admin)
                .with_email("ada@example.test"),
        )
        .expect("seed admin");
    directory
        .seed_user(
            UserProfile::new(manager_id, "mia", "Mia Manager", Role::Manager)
                .with_email("mia@example.test"),
        )
        .expect("seed manager");
    directory
        .seed_user(
            UserProfile::new(member_id, "wen", "Wen Worker", Role::User)
                .with_email("wen@example.test")
                .with_team(team_id),
        )
        .expect("seed member");
    directory
        .seed_user(
            UserProfile::new(mate_id, "mo", "Mo Mate", Role::User)
                .with_email("mo@example.test")
                .with_team(team_id),
        )
        .expect("seed mate");

    let mut roster = team;
    roster.add_member(member_id, &FixedClock(now()));
    roster.add_member(mate_id, &FixedClock(now()));
    directory.seed_team(roster).expect("store team");

    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&notifications),
        Arc::clone(&email),
        Arc::new(NoopPush),
        Arc::clone(&directory),
        Arc::new(FixedClock(now())),
    );
    let (queue, worker) = dispatch_pipeline(dispatcher);
    let queue = Arc::new(queue);

    let service = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&directory),
        Arc::clone(&directory),
        Arc::clone(&queue),
        Arc::new(FixedClock(now())),
    );
    let scheduler = ReminderScheduler::new(
        Arc::clone(&tasks),
        Arc::clone(&directory),
        Arc::clone(&queue),
        Arc::new(FixedClock(now())),
        ReminderConfig::default(),
    );
    let inbox = NotificationInbox::new(Arc::clone(&notifications), Arc::clone(&tasks));

    TestEnv {
        notifications,
        email,
        service,
        worker,
        scheduler,
        inbox,
        admin: Actor::new(admin_id, Role::Admin, None),
        manager: Actor::new(manager_id, Role::Manager, None),
        member: Actor::new(member_id, Role::User, Some(team_id)),
        mate: Actor::new(mate_id, Role::User, Some(team_id)),
        team_id,
    }
}

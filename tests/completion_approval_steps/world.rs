//! Shared world state for completion approval BDD scenarios.

use std::sync::Arc;

use gantt::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{Role, UserId, UserProfile},
};
use gantt::notification::adapters::memory::CollectingGateway;
use gantt::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Actor, Task},
    services::{TaskLifecycleService, TaskServiceError},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type WorldService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryDirectory,
    InMemoryDirectory,
    CollectingGateway,
    DefaultClock,
>;

/// Scenario world for completion approval behaviour tests.
pub struct ApprovalWorld {
    pub service: WorldService,
    pub gateway: Arc<CollectingGateway>,
    pub admin: Actor,
    pub manager: Actor,
    pub member: Actor,
    pub task: Option<Task>,
    pub last_result: Option<Result<Task, TaskServiceError>>,
}

impl ApprovalWorld {
    /// Creates a world with an admin, a manager, and one member seeded.
    #[must_use]
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let gateway = Arc::new(CollectingGateway::new());

        let admin_id = UserId::new();
        let manager_id = UserId::new();
        let member_id = UserId::new();

        directory
            .seed_user(UserProfile::new(admin_id, "ada", "Ada Admin", Role::Admin))
            .expect("seed admin");
        directory
            .seed_user(UserProfile::new(
                manager_id,
                "mia",
                "Mia Manager",
                Role::Manager,
            ))
            .expect("seed manager");
        directory
            .seed_user(
                UserProfile::new(member_id, "wen", "Wen Worker", Role::User)
                    .with_email("wen@example.test"),
            )
            .expect("seed member");

        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::clone(&directory),
            Arc::clone(&directory),
            Arc::clone(&gateway),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            gateway,
            admin: Actor::new(admin_id, Role::Admin, None),
            manager: Actor::new(manager_id, Role::Manager, None),
            member: Actor::new(member_id, Role::User, None),
            task: None,
            last_result: None,
        }
    }
}

impl Default for ApprovalWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ApprovalWorld {
    ApprovalWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

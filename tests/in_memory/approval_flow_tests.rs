//! End-to-end completion approval round trips.

use super::helpers::{TestEnv, env, now};
use chrono::Duration;
use gantt::notification::domain::NotificationType;
use gantt::notification::ports::{NotificationQuery, NotificationRepository};
use gantt::task::domain::{Task, TaskStatus, UpdateTaskRequest};
use gantt::task::services::CreateTaskRequest;

fn status_body(status: &str) -> UpdateTaskRequest {
    UpdateTaskRequest {
        status: Some(status.to_owned()),
        ..UpdateTaskRequest::default()
    }
}

async fn assigned_task(test_env: &mut TestEnv) -> Task {
    let task = test_env
        .service
        .create_task(
            test_env.admin,
            CreateTaskRequest::new(
                "Quarterly numbers",
                "Close out the quarter",
                now() + Duration::days(2),
            )
            .with_assignee(test_env.member.id()),
        )
        .await
        .expect("task creation should succeed");
    test_env.worker.drain().await;
    task
}

#[tokio::test(flavor = "multi_thread")]
async fn member_completion_pings_every_privileged_user() {
    let mut test_env = env();
    let task = assigned_task(&mut test_env).await;

    let updated = test_env
        .service
        .update_task(test_env.member, task.id(), status_body("completed"))
        .await
        .expect("member completion should succeed");
    assert!(updated.needs_completion_approval());
    assert_eq!(updated.completed_at(), None);

    test_env.worker.drain().await;

    for approver in [test_env.admin, test_env.manager] {
        let page = test_env
            .notifications
            .list_for_user(approver.id(), NotificationQuery::default())
            .await
            .expect("listing should succeed");
        assert_eq!(page.total, 1);
        assert_eq!(
            page.items.first().map(|n| n.kind()),
            Some(NotificationType::TaskPendingApproval)
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn approval_completes_the_task_and_notifies_the_assignee() {
    let mut test_env = env();
    let task = assigned_task(&mut test_env).await;
    test_env
        .service
        .update_task(test_env.member, task.id(), status_body("completed"))
        .await
        .expect("member completion should succeed");
    test_env.worker.drain().await;

    let approved = test_env
        .service
        .update_task(test_env.manager, task.id(), status_body("completed"))
        .await
        .expect("approval should succeed");
    assert_eq!(approved.status(), TaskStatus::Completed);
    assert!(!approved.needs_completion_approval());
    assert!(approved.completed_at().is_some());

    test_env.worker.drain().await;

    let page = test_env
        .notifications
        .list_for_user(test_env.member.id(), NotificationQuery::default())
        .await
        .expect("listing should succeed");
    // Newest first: the approval, then the original assignment.
    assert_eq!(page.total, 2);
    let kinds: Vec<NotificationType> = page.items.iter().map(|n| n.kind()).collect();
    assert!(kinds.contains(&NotificationType::TaskApproved));
    assert!(kinds.contains(&NotificationType::TaskAssigned));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejection_reopens_the_task_and_notifies_the_assignee() {
    let mut test_env = env();
    let task = assigned_task(&mut test_env).await;
    test_env
        .service
        .update_task(test_env.member, task.id(), status_body("completed"))
        .await
        .expect("member completion should succeed");
    test_env.worker.drain().await;

    let rejected = test_env
        .service
        .update_task(test_env.manager, task.id(), status_body("in_progress"))
        .await
        .expect("rejection should succeed");
    assert_eq!(rejected.status(), TaskStatus::InProgress);
    assert!(!rejected.needs_completion_approval());
    assert_eq!(rejected.completed_at(), None);

    test_env.worker.drain().await;

    let page = test_env
        .notifications
        .list_for_user(test_env.member.id(), NotificationQuery::default())
        .await
        .expect("listing should succeed");
    let kinds: Vec<NotificationType> = page.items.iter().map(|n| n.kind()).collect();
    assert!(kinds.contains(&NotificationType::TaskRejected));
}

#[tokio::test(flavor = "multi_thread")]
async fn reping_while_pending_produces_no_new_notifications() {
    let mut test_env = env();
    let task = assigned_task(&mut test_env).await;
    test_env
        .service
        .update_task(test_env.member, task.id(), status_body("completed"))
        .await
        .expect("member completion should succeed");
    test_env.worker.drain().await;

    test_env
        .service
        .update_task(test_env.member, task.id(), status_body("completed"))
        .await
        .expect("re-ping should be accepted as a no-op");
    let summary = test_env.worker.drain().await;

    assert_eq!(summary.attempted, 0);
}

//! End-to-end assignment fan-out: engine → queue → worker → records/email.

use super::helpers::{TestEnv, env, now};
use chrono::Duration;
use gantt::notification::domain::NotificationType;
use gantt::notification::ports::{NotificationQuery, NotificationRepository};
use gantt::task::domain::{FieldPatch, UpdateTaskRequest};
use gantt::task::services::CreateTaskRequest;

fn request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(title, "integration fixture", now() + Duration::days(1))
}

#[tokio::test(flavor = "multi_thread")]
async fn team_task_creation_reaches_every_member_and_nobody_else() {
    let mut test_env: TestEnv = env();
    test_env
        .service
        .create_task(
            test_env.admin,
            request("Team rollout").with_team(test_env.team_id),
        )
        .await
        .expect("task creation should succeed");

    let summary = test_env.worker.drain().await;
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.stored, 2);

    for actor in [test_env.member, test_env.mate] {
        let page = test_env
            .notifications
            .list_for_user(actor.id(), NotificationQuery::default())
            .await
            .expect("listing should succeed");
        assert_eq!(page.total, 1);
        assert_eq!(
            page.items.first().map(|n| n.kind()),
            Some(NotificationType::TeamTaskAssigned)
        );
    }
    for bystander in [test_env.admin, test_env.manager] {
        let page = test_env
            .notifications
            .list_for_user(bystander.id(), NotificationQuery::default())
            .await
            .expect("listing should succeed");
        assert_eq!(page.total, 0);
    }

    let recipients: Vec<String> = test_env
        .email
        .sent()
        .into_iter()
        .map(|message| message.to)
        .collect();
    assert_eq!(recipients.len(), 2);
    assert!(recipients.contains(&"wen@example.test".to_owned()));
    assert!(recipients.contains(&"mo@example.test".to_owned()));
}

#[tokio::test(flavor = "multi_thread")]
async fn reassignment_notifies_the_new_assignee_only() {
    let mut test_env: TestEnv = env();
    let task = test_env
        .service
        .create_task(
            test_env.admin,
            request("Handover").with_assignee(test_env.member.id()),
        )
        .await
        .expect("task creation should succeed");
    test_env.worker.drain().await;

    let update = UpdateTaskRequest {
        assignee: FieldPatch::Set(test_env.mate.id()),
        ..UpdateTaskRequest::default()
    };
    test_env
        .service
        .update_task(test_env.admin, task.id(), update)
        .await
        .expect("reassignment should succeed");
    test_env.worker.drain().await;

    let new_assignee_page = test_env
        .notifications
        .list_for_user(test_env.mate.id(), NotificationQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(new_assignee_page.total, 1);
    assert_eq!(
        new_assignee_page.items.first().map(|n| n.kind()),
        Some(NotificationType::TaskAssigned)
    );

    // The previous assignee only ever saw the original assignment.
    let old_assignee_page = test_env
        .notifications
        .list_for_user(test_env.member.id(), NotificationQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(old_assignee_page.total, 1);
    assert_eq!(
        old_assignee_page.items.first().map(|n| n.kind()),
        Some(NotificationType::TaskAssigned)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn a_failed_mutation_dispatches_nothing() {
    let mut test_env: TestEnv = env();
    let result = test_env
        .service
        .create_task(
            test_env.admin,
            request("   ").with_assignee(test_env.member.id()),
        )
        .await;
    assert!(result.is_err());

    let summary = test_env.worker.drain().await;
    assert_eq!(summary.attempted, 0);
    assert!(test_env.email.sent().is_empty());
}

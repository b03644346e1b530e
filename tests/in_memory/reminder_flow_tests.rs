//! End-to-end reminder runs: scheduler → queue → worker → records.

use super::helpers::{TestEnv, env, now};
use chrono::Duration;
use gantt::notification::domain::NotificationType;
use gantt::notification::ports::{NotificationQuery, NotificationRepository};
use gantt::task::services::CreateTaskRequest;

#[tokio::test(flavor = "multi_thread")]
async fn overdue_task_reminds_its_assignee_exactly_once() {
    let mut test_env: TestEnv = env();
    test_env
        .service
        .create_task(
            test_env.admin,
            CreateTaskRequest::new(
                "Expense report",
                "File last month's expenses",
                now() - Duration::days(1),
            )
            .with_assignee(test_env.member.id()),
        )
        .await
        .expect("task creation should succeed");
    test_env.worker.drain().await;

    let first = test_env.scheduler.run().await;
    assert_eq!(first.overdue.flagged, 1);
    test_env.worker.drain().await;

    let page = test_env
        .notifications
        .list_for_user(test_env.member.id(), NotificationQuery::default())
        .await
        .expect("listing should succeed");
    let overdue_count = page
        .items
        .iter()
        .filter(|n| n.kind() == NotificationType::TaskOverdue)
        .count();
    assert_eq!(overdue_count, 1);

    let second = test_env.scheduler.run().await;
    assert_eq!(second.overdue.matched, 0);
    let summary = test_env.worker.drain().await;
    assert_eq!(summary.attempted, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn due_soon_team_task_reminds_the_whole_roster() {
    let mut test_env: TestEnv = env();
    test_env
        .service
        .create_task(
            test_env.admin,
            CreateTaskRequest::new(
                "Sprint demo",
                "Prepare the sprint demo",
                now() + Duration::days(1),
            )
            .with_team(test_env.team_id),
        )
        .await
        .expect("task creation should succeed");
    test_env.worker.drain().await;

    let report = test_env.scheduler.run().await;
    assert_eq!(report.due_soon.flagged, 1);
    assert_eq!(report.due_soon.notified, 2);
    test_env.worker.drain().await;

    for actor in [test_env.member, test_env.mate] {
        let page = test_env
            .notifications
            .list_for_user(actor.id(), NotificationQuery::default())
            .await
            .expect("listing should succeed");
        assert!(
            page.items
                .iter()
                .any(|n| n.kind() == NotificationType::TaskDueSoon)
        );
    }
}

//! Inbox behaviour over records produced by the real pipeline.

use super::helpers::{TestEnv, env, now};
use chrono::Duration;
use gantt::notification::domain::NotificationStatus;
use gantt::notification::ports::NotificationQuery;
use gantt::notification::services::InboxError;
use gantt::task::services::CreateTaskRequest;

#[tokio::test(flavor = "multi_thread")]
async fn assignee_reads_and_clears_their_own_inbox() {
    let mut test_env: TestEnv = env();
    test_env
        .service
        .create_task(
            test_env.admin,
            CreateTaskRequest::new("Inbox fixture", "fixture", now() + Duration::days(2))
                .with_assignee(test_env.member.id()),
        )
        .await
        .expect("task creation should succeed");
    test_env.worker.drain().await;

    let page = test_env
        .inbox
        .list(test_env.member.id(), NotificationQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(page.total, 1);
    let entry = page.entries.first().expect("one entry");
    assert_eq!(entry.notification.status(), NotificationStatus::Unread);
    assert_eq!(
        entry.task.as_ref().map(|summary| summary.title.clone()),
        Some("Inbox fixture".to_owned())
    );

    // Another user may neither read nor delete it.
    let foreign = test_env
        .inbox
        .mark_read(test_env.mate.id(), entry.notification.id())
        .await;
    assert!(matches!(foreign, Err(InboxError::NotOwner { .. })));

    let read = test_env
        .inbox
        .mark_read(test_env.member.id(), entry.notification.id())
        .await
        .expect("owner mark-read should succeed");
    assert_eq!(read.status(), NotificationStatus::Read);

    test_env
        .inbox
        .delete(test_env.member.id(), entry.notification.id())
        .await
        .expect("owner delete should succeed");
    let emptied = test_env
        .inbox
        .list(test_env.member.id(), NotificationQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(emptied.total, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn task_deletion_leaves_inbox_entries_readable() {
    let mut test_env: TestEnv = env();
    let task = test_env
        .service
        .create_task(
            test_env.admin,
            CreateTaskRequest::new("Doomed task", "fixture", now() + Duration::days(2))
                .with_assignee(test_env.member.id()),
        )
        .await
        .expect("task creation should succeed");
    test_env.worker.drain().await;

    test_env
        .service
        .delete_task(test_env.admin, task.id())
        .await
        .expect("deletion should succeed");

    let page = test_env
        .inbox
        .list(test_env.member.id(), NotificationQuery::default())
        .await
        .expect("listing must tolerate the dangling task reference");
    assert_eq!(page.total, 1);
    assert!(page.entries.first().expect("one entry").task.is_none());
}

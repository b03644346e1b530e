//! Then steps for completion approval BDD scenarios.

use std::collections::BTreeSet;

use super::world::ApprovalWorld;
use gantt::directory::domain::UserId;
use gantt::notification::domain::NotificationType;
use gantt::task::domain::TaskStatus;
use rstest_bdd_macros::then;

#[then("the task is pending completion approval")]
fn task_is_pending_approval(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task"))?;

    eyre::ensure!(task.status() == TaskStatus::Completed);
    eyre::ensure!(task.needs_completion_approval());
    eyre::ensure!(task.completed_at().is_none());
    Ok(())
}

#[then("every privileged user is asked to approve")]
fn privileged_users_are_pinged(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let intents = world.gateway.collected();
    let recipients: BTreeSet<UserId> = intents
        .iter()
        .filter(|intent| intent.kind() == NotificationType::TaskPendingApproval)
        .map(|intent| intent.recipient())
        .collect();

    let expected = BTreeSet::from([world.admin.id(), world.manager.id()]);
    if recipients != expected {
        return Err(eyre::eyre!(
            "expected approval pings for {expected:?}, found {recipients:?}"
        ));
    }
    Ok(())
}

#[then("the task is approved complete")]
fn task_is_approved_complete(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task"))?;

    eyre::ensure!(task.status() == TaskStatus::Completed);
    eyre::ensure!(!task.needs_completion_approval());
    eyre::ensure!(task.completed_at().is_some());
    Ok(())
}

#[then(r#"the member is notified of type "{kind}""#)]
fn member_is_notified(world: &ApprovalWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = NotificationType::try_from(kind.as_str())
        .map_err(|err| eyre::eyre!("invalid expected notification type in scenario: {err}"))?;

    let matching = world
        .gateway
        .collected()
        .into_iter()
        .filter(|intent| intent.kind() == expected && intent.recipient() == world.member.id())
        .count();
    if matching != 1 {
        return Err(eyre::eyre!(
            "expected exactly one {} intent for the member, found {matching}",
            expected.as_str()
        ));
    }
    Ok(())
}

#[then(r#"the task is back in "{status}" without approval flags"#)]
fn task_is_reopened(world: &ApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task"))?;

    eyre::ensure!(task.status() == expected);
    eyre::ensure!(!task.needs_completion_approval());
    eyre::ensure!(task.completed_at().is_none());
    Ok(())
}

#[then("no new notifications are produced")]
fn no_new_notifications(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let intents = world.gateway.collected();
    if !intents.is_empty() {
        return Err(eyre::eyre!("expected no intents, found {}", intents.len()));
    }
    Ok(())
}

//! Given steps for completion approval BDD scenarios.

use super::world::{ApprovalWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use gantt::task::domain::UpdateTaskRequest;
use gantt::task::services::CreateTaskRequest;
use rstest_bdd_macros::given;

#[given("a task assigned to a member")]
fn task_assigned_to_member(world: &mut ApprovalWorld) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(
        "Quarterly numbers",
        "Close out the quarter",
        Utc::now() + Duration::days(2),
    )
    .with_assignee(world.member.id());

    let created = run_async(world.service.create_task(world.admin, request))
        .wrap_err("create assigned task for approval scenario")?;
    world.task = Some(created);
    drop(world.gateway.take());
    Ok(())
}

#[given(r#"the member has submitted status "{status}""#)]
fn member_has_submitted(world: &mut ApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let request = UpdateTaskRequest {
        status: Some(status),
        ..UpdateTaskRequest::default()
    };

    let updated = run_async(world.service.update_task(world.member, task.id(), request))
        .wrap_err("member submission during scenario setup")?;
    world.task = Some(updated);
    drop(world.gateway.take());
    Ok(())
}

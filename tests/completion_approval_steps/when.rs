//! When steps for completion approval BDD scenarios.

use super::world::{ApprovalWorld, run_async};
use gantt::task::domain::{Actor, UpdateTaskRequest};
use rstest_bdd_macros::when;

fn submit_status(
    world: &mut ApprovalWorld,
    actor: Actor,
    status: String,
) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let request = UpdateTaskRequest {
        status: Some(status),
        ..UpdateTaskRequest::default()
    };

    let result = run_async(world.service.update_task(actor, task.id(), request));
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the member submits status "{status}""#)]
fn member_submits(world: &mut ApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let actor = world.member;
    submit_status(world, actor, status)
}

#[when(r#"a manager submits status "{status}""#)]
fn manager_submits(world: &mut ApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let actor = world.manager;
    submit_status(world, actor, status)
}

//! Task lifecycle orchestration: creation, role-gated mutation, approval
//! workflow, deletion, and the assignment/approval notification fan-out.

use crate::directory::{
    domain::{TeamId, UserId, UserProfile},
    ports::{DirectoryStoreError, TeamStore, UserStore},
};
use crate::notification::domain::{NotificationIntent, NotificationType};
use crate::notification::ports::NotificationGateway;
use crate::notification::services::RecipientResolver;
use crate::task::{
    domain::{
        Actor, FieldPatch, NewTaskData, StatusView, Task, TaskCommand, TaskDomainError, TaskEdit,
        TaskId, TaskOwner, TaskPermissionError, TaskStatus, TransitionEvent, TransitionPlan,
        UpdateRequestError, UpdateTaskRequest, plan_transition,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    status: TaskStatus,
    tags: BTreeSet<String>,
    assignee: Option<UserId>,
    team: Option<TeamId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date,
            status: TaskStatus::Pending,
            tags: BTreeSet::new(),
            assignee: None,
            team: None,
        }
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the initial labels.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Assigns the task to a single user.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Assigns the task to a team.
    #[must_use]
    pub const fn with_team(mut self, team: TeamId) -> Self {
        self.team = Some(team);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Malformed input; nothing was written.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// The actor lacks permission for the requested mutation.
    #[error(transparent)]
    Forbidden(#[from] TaskPermissionError),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(TaskRepositoryError),

    /// Directory lookup failed while validating references.
    #[error("directory error: {0}")]
    Directory(DirectoryStoreError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<DirectoryStoreError> for TaskServiceError {
    fn from(err: DirectoryStoreError) -> Self {
        Self::Directory(err)
    }
}

impl From<UpdateRequestError> for TaskServiceError {
    fn from(err: UpdateRequestError) -> Self {
        match err {
            UpdateRequestError::UnknownStatus(parse) => {
                Self::Validation(TaskDomainError::UnknownStatus(parse))
            }
            UpdateRequestError::Forbidden(permission) => Self::Forbidden(permission),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task lifecycle orchestration service.
///
/// Mutation-path errors abort before any dispatch is attempted; intents are
/// enqueued only after a successful write, and enqueueing never fails the
/// caller.
#[derive(Clone)]
pub struct TaskLifecycleService<R, U, T, G, C>
where
    R: TaskRepository,
    U: UserStore,
    T: TeamStore,
    G: NotificationGateway,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    users: Arc<U>,
    teams: Arc<T>,
    gateway: Arc<G>,
    resolver: RecipientResolver<U>,
    clock: Arc<C>,
}

impl<R, U, T, G, C> TaskLifecycleService<R, U, T, G, C>
where
    R: TaskRepository,
    U: UserStore,
    T: TeamStore,
    G: NotificationGateway,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(
        tasks: Arc<R>,
        users: Arc<U>,
        teams: Arc<T>,
        gateway: Arc<G>,
        clock: Arc<C>,
    ) -> Self {
        let resolver = RecipientResolver::new(Arc::clone(&users));
        Self {
            tasks,
            users,
            teams,
            gateway,
            resolver,
            clock,
        }
    }

    /// Creates a task; Admin/Manager only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-privileged actors
    /// and [`TaskServiceError::Validation`] for empty required fields, an
    /// assignee-and-team combination, or references that do not resolve.
    pub async fn create_task(
        &self,
        actor: Actor,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        if !actor.is_privileged() {
            return Err(TaskPermissionError::PrivilegeRequired.into());
        }

        let owner = TaskOwner::from_refs(request.assignee, request.team)?;
        self.check_owner_resolves(owner).await?;

        let task = Task::new(
            NewTaskData {
                title: request.title,
                description: request.description,
                due_date: request.due_date,
                status: request.status,
                tags: request.tags,
                owner,
            },
            &*self.clock,
        )?;
        self.tasks.insert(&task).await?;
        info!(task = %task.id(), by = %actor.id(), "task created");

        let intents = self.assignment_intents(&task, TaskOwner::Unowned).await;
        self.enqueue(intents);
        Ok(task)
    }

    /// Applies a role-gated partial update.
    ///
    /// Privileged actors may edit any field; members may submit exactly the
    /// status of a task they own. An empty or effect-free request echoes
    /// the task back without writing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown tasks,
    /// [`TaskServiceError::Forbidden`] for field or ownership violations,
    /// and [`TaskServiceError::Validation`] for malformed values; all of
    /// these abort before any write or dispatch.
    pub async fn update_task(
        &self,
        actor: Actor,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let task = self.load(id).await?;
        let command = request.into_command(actor.role())?;

        match command {
            TaskCommand::Noop => {
                // Even an effect-free request must not leak tasks the actor
                // could not otherwise read.
                if !actor.is_privileged() && !actor.owns(&task) {
                    return Err(TaskPermissionError::NotOwner {
                        user: actor.id(),
                        task: task.id(),
                    }
                    .into());
                }
                Ok(task)
            }
            TaskCommand::SetStatus(requested) => {
                self.member_status_update(actor, task, requested).await
            }
            TaskCommand::Edit(edit) => self.privileged_edit(actor, task, edit).await,
        }
    }

    /// Deletes a task; Admin/Manager only. Notifications that reference the
    /// task are left in place and tolerated by the inbox.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-privileged actors
    /// and [`TaskServiceError::NotFound`] for unknown tasks.
    pub async fn delete_task(&self, actor: Actor, id: TaskId) -> TaskServiceResult<()> {
        if !actor.is_privileged() {
            return Err(TaskPermissionError::PrivilegeRequired.into());
        }
        self.tasks.delete(id).await?;
        info!(task = %id, by = %actor.id(), "task deleted");
        Ok(())
    }

    /// Fetches a task the actor may read.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown tasks and
    /// [`TaskServiceError::Forbidden`] when a member requests a task they
    /// neither own nor share a team with.
    pub async fn get_task(&self, actor: Actor, id: TaskId) -> TaskServiceResult<Task> {
        let task = self.load(id).await?;
        if !actor.can_view(&task) {
            return Err(TaskPermissionError::NotOwner {
                user: actor.id(),
                task: id,
            }
            .into());
        }
        Ok(task)
    }

    /// Lists tasks visible to the actor, newest first.
    ///
    /// Privileged actors see everything matching the filter; members are
    /// additionally scoped to tasks they own directly or via their team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] for store failures.
    pub async fn list_tasks(
        &self,
        actor: Actor,
        mut filter: TaskFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        if !actor.is_privileged() {
            filter.visible_to = Some((actor.id(), actor.team_id()));
        }
        Ok(self.tasks.list(&filter).await?)
    }

    async fn member_status_update(
        &self,
        actor: Actor,
        mut task: Task,
        requested: TaskStatus,
    ) -> TaskServiceResult<Task> {
        if !actor.owns(&task) {
            return Err(TaskPermissionError::NotOwner {
                user: actor.id(),
                task: task.id(),
            }
            .into());
        }

        let view = StatusView::from(&task);
        let plan = plan_transition(view, requested, actor.class(), self.clock.utc());
        if plan.is_noop(view) {
            return Ok(task);
        }

        task.apply_status(
            plan.status,
            plan.needs_completion_approval,
            plan.completed_at,
            &*self.clock,
        );
        self.tasks.update(&task).await?;
        info!(
            task = %task.id(),
            by = %actor.id(),
            status = plan.status.as_str(),
            pending_approval = plan.needs_completion_approval,
            "member status update applied"
        );

        let intents = self.approval_intents(&task, &plan).await;
        self.enqueue(intents);
        Ok(task)
    }

    async fn privileged_edit(
        &self,
        actor: Actor,
        mut task: Task,
        edit: TaskEdit,
    ) -> TaskServiceResult<Task> {
        if !actor.is_privileged() {
            return Err(TaskPermissionError::PrivilegeRequired.into());
        }
        if edit.is_empty() {
            return Ok(task);
        }

        let previous_owner = task.owner();

        if let Some(title) = edit.title {
            task.set_title(title, &*self.clock)?;
        }
        if let Some(description) = edit.description {
            task.set_description(description, &*self.clock)?;
        }
        if let Some(due_date) = edit.due_date {
            task.set_due_date(due_date, &*self.clock);
        }
        if let Some(tags) = edit.tags {
            task.set_tags(tags, &*self.clock);
        }

        let new_owner = self
            .resolve_owner_patch(previous_owner, edit.assignee, edit.team)
            .await?;
        if new_owner != previous_owner {
            task.set_owner(new_owner, &*self.clock);
        }

        let mut plan: Option<TransitionPlan> = None;
        if let Some(requested) = edit.status {
            let view = StatusView::from(&task);
            let planned = plan_transition(view, requested, actor.class(), self.clock.utc());
            if !planned.is_noop(view) {
                task.apply_status(
                    planned.status,
                    planned.needs_completion_approval,
                    planned.completed_at,
                    &*self.clock,
                );
            }
            plan = Some(planned);
        }

        self.tasks.update(&task).await?;
        info!(task = %task.id(), by = %actor.id(), "task updated");

        let mut intents = self.assignment_intents(&task, previous_owner).await;
        if let Some(planned) = plan {
            intents.extend(self.approval_intents(&task, &planned).await);
        }
        self.enqueue(intents);
        Ok(task)
    }

    async fn resolve_owner_patch(
        &self,
        current: TaskOwner,
        assignee: FieldPatch<UserId>,
        team: FieldPatch<TeamId>,
    ) -> TaskServiceResult<TaskOwner> {
        let owner = match (assignee, team) {
            (FieldPatch::Set(_), FieldPatch::Set(_)) => {
                return Err(TaskDomainError::AssigneeAndTeam.into());
            }
            (FieldPatch::Set(user), _) => TaskOwner::User { id: user },
            (_, FieldPatch::Set(team_id)) => TaskOwner::Team { id: team_id },
            (assignee_patch, team_patch) => {
                let mut owner = current;
                if matches!(assignee_patch, FieldPatch::Clear)
                    && matches!(owner, TaskOwner::User { .. })
                {
                    owner = TaskOwner::Unowned;
                }
                if matches!(team_patch, FieldPatch::Clear)
                    && matches!(owner, TaskOwner::Team { .. })
                {
                    owner = TaskOwner::Unowned;
                }
                owner
            }
        };

        if owner != current {
            self.check_owner_resolves(owner).await?;
        }
        Ok(owner)
    }

    async fn check_owner_resolves(&self, owner: TaskOwner) -> TaskServiceResult<()> {
        match owner {
            TaskOwner::User { id } => {
                if self.users.find_by_id(id).await?.is_none() {
                    return Err(TaskDomainError::UnknownAssignee(id).into());
                }
            }
            TaskOwner::Team { id } => {
                if self.teams.find_by_id(id).await?.is_none() {
                    return Err(TaskDomainError::UnknownTeam(id).into());
                }
            }
            TaskOwner::Unowned => {}
        }
        Ok(())
    }

    /// Builds the assignment-change fan-out by comparing the task's owner
    /// with its previous owner. Runs strictly after the write; resolution
    /// failures degrade to an empty fan-out.
    async fn assignment_intents(
        &self,
        task: &Task,
        previous_owner: TaskOwner,
    ) -> Vec<NotificationIntent> {
        let link = task_link(task.id());

        match task.owner() {
            TaskOwner::User { id } if previous_owner.assignee() != Some(id) => {
                vec![
                    NotificationIntent::new(
                        id,
                        task.id(),
                        NotificationType::TaskAssigned,
                        format!("You have been assigned a task: {}", task.title()),
                    )
                    .with_link(link)
                    .with_email(format!("New task assigned: {}", task.title())),
                ]
            }
            TaskOwner::Team { id } if previous_owner.team() != Some(id) => {
                let audience = self.audience_or_empty(task.owner()).await;
                audience
                    .iter()
                    .map(|member| {
                        NotificationIntent::new(
                            member.id(),
                            task.id(),
                            NotificationType::TeamTaskAssigned,
                            format!("New team task assigned: {}", task.title()),
                        )
                        .with_link(link.clone())
                        .with_email(format!("New team task: {}", task.title()))
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Builds the approval-workflow fan-out for the plan's events. Runs
    /// strictly after the write; resolution failures degrade to an empty
    /// fan-out.
    async fn approval_intents(
        &self,
        task: &Task,
        plan: &TransitionPlan,
    ) -> Vec<NotificationIntent> {
        let link = task_link(task.id());
        let mut intents = Vec::new();

        for event in &plan.events {
            match event {
                TransitionEvent::ApprovalRequested => {
                    let approvers = match self.resolver.privileged_users().await {
                        Ok(approvers) => approvers,
                        Err(err) => {
                            warn!(task = %task.id(), error = %err, "approver lookup failed");
                            Vec::new()
                        }
                    };
                    intents.extend(approvers.iter().map(|approver| {
                        NotificationIntent::new(
                            approver.id(),
                            task.id(),
                            NotificationType::TaskPendingApproval,
                            format!("Task \"{}\" is awaiting completion approval", task.title()),
                        )
                        .with_link(link.clone())
                    }));
                }
                TransitionEvent::Approved => {
                    let audience = self.audience_or_empty(task.owner()).await;
                    intents.extend(audience.iter().map(|member| {
                        NotificationIntent::new(
                            member.id(),
                            task.id(),
                            NotificationType::TaskApproved,
                            format!("Your completion of \"{}\" was approved", task.title()),
                        )
                        .with_link(link.clone())
                    }));
                }
                TransitionEvent::Rejected => {
                    let audience = self.audience_or_empty(task.owner()).await;
                    intents.extend(audience.iter().map(|member| {
                        NotificationIntent::new(
                            member.id(),
                            task.id(),
                            NotificationType::TaskRejected,
                            format!(
                                "Completion of \"{}\" was rejected; it is back in {}",
                                task.title(),
                                plan.status.as_str()
                            ),
                        )
                        .with_link(link.clone())
                    }));
                }
            }
        }

        intents
    }

    async fn audience_or_empty(&self, owner: TaskOwner) -> Vec<UserProfile> {
        match self.resolver.task_audience(owner).await {
            Ok(audience) => audience,
            Err(err) => {
                warn!(error = %err, "audience resolution failed");
                Vec::new()
            }
        }
    }

    fn enqueue(&self, intents: Vec<NotificationIntent>) {
        if !intents.is_empty() {
            self.gateway.enqueue(intents);
        }
    }

    async fn load(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }
}

/// Canonical in-app link to a task.
fn task_link(id: TaskId) -> String {
    format!("/task/{id}")
}

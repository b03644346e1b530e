//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::directory::domain::{TeamId, UserId};
use crate::task::{
    domain::{
        PersistedTaskData, ReminderFlag, Task, TaskId, TaskOwner, TaskStatus,
    },
    ports::{
        ReminderScan, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::collections::BTreeSet;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let new_row = to_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(row.id)))
                .set(&row)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();

            if let Some(status) = criteria.status {
                query = query.filter(tasks::status.eq(status.as_str().to_owned()));
            }
            if let Some(assignee) = criteria.assignee {
                query = query.filter(tasks::assignee_id.eq(assignee.into_inner()));
            }
            if let Some(team) = criteria.team {
                query = query.filter(tasks::team_id.eq(team.into_inner()));
            }
            if let Some((user, team)) = criteria.visible_to {
                query = match team {
                    Some(team_id) => query.filter(
                        tasks::assignee_id
                            .eq(user.into_inner())
                            .or(tasks::team_id.eq(team_id.into_inner())),
                    ),
                    None => query.filter(tasks::assignee_id.eq(user.into_inner())),
                };
            }

            let rows = query
                .order(tasks::created_at.desc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let mut loaded = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<Task>>>()?;

            // Tags live in a jsonb column; the (rare) tag filter is applied
            // after hydration rather than through a JSON containment query.
            if let Some(tag) = criteria.tag {
                let wanted = tag.to_ascii_lowercase();
                loaded.retain(|task| {
                    task.tags()
                        .iter()
                        .any(|candidate| candidate.to_ascii_lowercase() == wanted)
                });
            }
            Ok(loaded)
        })
        .await
    }

    async fn find_for_reminder(&self, scan: ReminderScan) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .into_boxed()
                .filter(tasks::status.ne(TaskStatus::Completed.as_str()))
                .filter(tasks::due_date.lt(scan.due_before));

            query = match scan.flag {
                ReminderFlag::DueSoon => query.filter(tasks::due_reminder_sent.eq(false)),
                ReminderFlag::Overdue => query.filter(tasks::overdue_reminder_sent.eq(false)),
            };
            if let Some(from) = scan.due_from {
                query = query.filter(tasks::due_date.ge(from));
            }

            let rows = query
                .order(tasks::due_date.asc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn mark_reminders_sent(
        &self,
        ids: &[TaskId],
        flag: ReminderFlag,
    ) -> TaskRepositoryResult<()> {
        let raw_ids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let target = tasks::table.filter(tasks::id.eq_any(raw_ids));
            let result = match flag {
                ReminderFlag::DueSoon => diesel::update(target)
                    .set(tasks::due_reminder_sent.eq(true))
                    .execute(connection),
                ReminderFlag::Overdue => diesel::update(target)
                    .set(tasks::overdue_reminder_sent.eq(true))
                    .execute(connection),
            };
            result.map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let tags = serde_json::to_value(task.tags()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        tags,
        assignee_id: task.assignee_id().map(UserId::into_inner),
        team_id: task.team_id().map(TeamId::into_inner),
        completed_at: task.completed_at(),
        needs_completion_approval: task.needs_completion_approval(),
        due_reminder_sent: task.due_reminder_sent(),
        overdue_reminder_sent: task.overdue_reminder_sent(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let tags: BTreeSet<String> =
        serde_json::from_value(row.tags).map_err(TaskRepositoryError::persistence)?;
    let owner = TaskOwner::from_refs(
        row.assignee_id.map(UserId::from_uuid),
        row.team_id.map(TeamId::from_uuid),
    )
    .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        due_date: row.due_date,
        status,
        tags,
        owner,
        completed_at: row.completed_at,
        needs_completion_approval: row.needs_completion_approval,
        due_reminder_sent: row.due_reminder_sent,
        overdue_reminder_sent: row.overdue_reminder_sent,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

//! In-memory task repository for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ReminderFlag, Task, TaskId, TaskStatus},
    ports::{
        ReminderScan, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn matches_filter(task: &Task, filter: &TaskFilter) -> bool {
    if let Some(status) = filter.status {
        if task.status() != status {
            return false;
        }
    }
    if let Some(assignee) = filter.assignee {
        if task.assignee_id() != Some(assignee) {
            return false;
        }
    }
    if let Some(team) = filter.team {
        if task.team_id() != Some(team) {
            return false;
        }
    }
    if let Some(tag) = &filter.tag {
        let wanted = tag.to_ascii_lowercase();
        if !task
            .tags()
            .iter()
            .any(|candidate| candidate.to_ascii_lowercase() == wanted)
        {
            return false;
        }
    }
    if let Some((user, team)) = filter.visible_to {
        let direct = task.assignee_id() == Some(user);
        let via_team = task.team_id().is_some() && task.team_id() == team;
        if !direct && !via_team {
            return false;
        }
    }
    true
}

fn matches_scan(task: &Task, scan: ReminderScan) -> bool {
    if task.status() == TaskStatus::Completed {
        return false;
    }
    let latched = match scan.flag {
        ReminderFlag::DueSoon => task.due_reminder_sent(),
        ReminderFlag::Overdue => task.overdue_reminder_sent(),
    };
    if latched {
        return false;
    }
    if let Some(from) = scan.due_from {
        if task.due_date() < from {
            return false;
        }
    }
    task.due_date() < scan.due_before
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .values()
            .filter(|task| matches_filter(task, filter))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(tasks)
    }

    async fn find_for_reminder(&self, scan: ReminderScan) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .values()
            .filter(|task| matches_scan(task, scan))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.due_date().cmp(&b.due_date()));
        Ok(tasks)
    }

    async fn mark_reminders_sent(
        &self,
        ids: &[TaskId],
        flag: ReminderFlag,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        for id in ids {
            if let Some(task) = state.get_mut(id) {
                task.mark_reminder_sent(flag);
            }
        }
        Ok(())
    }
}

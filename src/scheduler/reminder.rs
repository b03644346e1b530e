//! Daily reminder job: due-soon and overdue fan-out with latch flags.

use crate::directory::ports::UserStore;
use crate::notification::domain::{NotificationIntent, NotificationType};
use crate::notification::ports::NotificationGateway;
use crate::notification::services::RecipientResolver;
use crate::task::{
    domain::{ReminderFlag, Task, TaskId, TaskOwner},
    ports::{ReminderScan, TaskRepository},
};
use chrono::{Duration, FixedOffset, Offset, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::cron::{local_day_start, next_daily_run};

/// Reminder schedule configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// How many days ahead the due-soon window reaches.
    #[serde(default = "default_days_before")]
    pub days_before: u32,
    /// Local hour the daily job fires at.
    #[serde(default = "default_hour")]
    pub hour: u32,
    /// Local minute the daily job fires at.
    #[serde(default = "default_minute")]
    pub minute: u32,
    /// Local zone as whole hours east of UTC; Bangkok is +7.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

const fn default_days_before() -> u32 {
    3
}

const fn default_hour() -> u32 {
    9
}

const fn default_minute() -> u32 {
    0
}

const fn default_utc_offset_hours() -> i32 {
    7
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            days_before: default_days_before(),
            hour: default_hour(),
            minute: default_minute(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl ReminderConfig {
    /// Returns the configured zone as a fixed offset.
    ///
    /// Out-of-range offsets fall back to UTC.
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours.clamp(-23, 23).saturating_mul(3600))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Outcome counters for one scan of one condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Tasks matching the condition with an unset latch.
    pub matched: usize,
    /// Intents enqueued across all recipients.
    pub notified: usize,
    /// Tasks whose latch was set.
    pub flagged: usize,
    /// Tasks skipped because no recipient resolved.
    pub orphaned: usize,
}

/// Outcome of one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderRunReport {
    /// The run was skipped because a previous run still holds the lock.
    pub skipped: bool,
    /// Due-soon scan counters.
    pub due_soon: ScanReport,
    /// Overdue scan counters.
    pub overdue: ScanReport,
}

/// Daily reminder scheduler.
///
/// Each run performs two independent scans, due-soon and overdue, and
/// notifies each task's audience exactly once per condition: the latch
/// flag is set as soon as at least one recipient resolves and is never
/// cleared by the scheduler, so a re-run in the same flag state enqueues
/// nothing.
pub struct ReminderScheduler<R, U, G, C>
where
    R: TaskRepository,
    U: UserStore,
    G: NotificationGateway,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    resolver: RecipientResolver<U>,
    gateway: Arc<G>,
    clock: Arc<C>,
    config: ReminderConfig,
    run_lock: Arc<Mutex<()>>,
}

// Manual impl: clones share the run lock, so a spawned run and the timer
// loop coordinate on the same mutex.
impl<R, U, G, C> Clone for ReminderScheduler<R, U, G, C>
where
    R: TaskRepository,
    U: UserStore,
    G: NotificationGateway,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            resolver: self.resolver.clone(),
            gateway: Arc::clone(&self.gateway),
            clock: Arc::clone(&self.clock),
            config: self.config,
            run_lock: Arc::clone(&self.run_lock),
        }
    }
}

impl<R, U, G, C> ReminderScheduler<R, U, G, C>
where
    R: TaskRepository,
    U: UserStore,
    G: NotificationGateway,
    C: Clock + Send + Sync,
{
    /// Creates a scheduler.
    #[must_use]
    pub fn new(
        tasks: Arc<R>,
        users: Arc<U>,
        gateway: Arc<G>,
        clock: Arc<C>,
        config: ReminderConfig,
    ) -> Self {
        Self {
            tasks,
            resolver: RecipientResolver::new(users),
            gateway,
            clock,
            config,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The scheduling-harness entry point: one full reminder pass.
    ///
    /// Overlapping invocations are skipped rather than queued; the
    /// previous run keeps the lock until it finishes.
    pub async fn run(&self) -> ReminderRunReport {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!("reminder run still in flight; skipping this tick");
            return ReminderRunReport {
                skipped: true,
                ..ReminderRunReport::default()
            };
        };

        let now = self.clock.utc();
        let offset = self.config.offset();
        let today = local_day_start(now, offset);
        let window_end = today + Duration::days(i64::from(self.config.days_before) + 1);

        info!(
            window_start = %today,
            window_end = %window_end,
            "reminder run started"
        );

        let due_soon = self
            .scan(
                ReminderScan {
                    flag: ReminderFlag::DueSoon,
                    due_from: Some(today),
                    due_before: window_end,
                },
                offset,
            )
            .await;
        let overdue = self
            .scan(
                ReminderScan {
                    flag: ReminderFlag::Overdue,
                    due_from: None,
                    due_before: today,
                },
                offset,
            )
            .await;

        info!(
            due_soon = due_soon.flagged,
            overdue = overdue.flagged,
            "reminder run finished"
        );
        ReminderRunReport {
            skipped: false,
            due_soon,
            overdue,
        }
    }

    /// Runs forever, firing at the configured local time once a day.
    ///
    /// The job itself is spawned off the timer loop, so a slow run never
    /// delays the next tick; the run lock prevents overlapping passes from
    /// double-scanning.
    pub async fn run_daily(self)
    where
        R: 'static,
        U: 'static,
        G: 'static,
        C: 'static,
    {
        loop {
            let now = self.clock.utc();
            let next = next_daily_run(now, self.config.hour, self.config.minute, self.config.offset());
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next_run = %next, "reminder scheduler sleeping until next tick");
            tokio::time::sleep(wait).await;

            let job = self.clone();
            tokio::spawn(async move {
                job.run().await;
            });
        }
    }

    async fn scan(&self, scan: ReminderScan, offset: FixedOffset) -> ScanReport {
        let tasks = match self.tasks.find_for_reminder(scan).await {
            Ok(tasks) => tasks,
            Err(err) => {
                error!(error = %err, "reminder scan query failed");
                return ScanReport::default();
            }
        };

        let mut report = ScanReport {
            matched: tasks.len(),
            ..ScanReport::default()
        };
        let mut intents = Vec::new();
        let mut flagged_ids: Vec<TaskId> = Vec::new();

        for task in &tasks {
            if task.owner() == TaskOwner::Unowned {
                warn!(task = %task.id(), "task has neither assignee nor team; skipping reminder");
                report.orphaned += 1;
                continue;
            }

            let audience = match self.resolver.task_audience(task.owner()).await {
                Ok(audience) => audience,
                Err(err) => {
                    error!(task = %task.id(), error = %err, "audience resolution failed");
                    continue;
                }
            };
            if audience.is_empty() {
                warn!(task = %task.id(), "task audience resolved to nobody; leaving latch unset");
                report.orphaned += 1;
                continue;
            }

            for recipient in &audience {
                intents.push(reminder_intent(task, scan.flag, recipient.id(), offset));
            }
            report.notified += audience.len();
            flagged_ids.push(task.id());
        }

        if !intents.is_empty() {
            self.gateway.enqueue(intents);
        }
        if !flagged_ids.is_empty() {
            match self.tasks.mark_reminders_sent(&flagged_ids, scan.flag).await {
                Ok(()) => report.flagged = flagged_ids.len(),
                Err(err) => error!(error = %err, "failed to latch reminder flags"),
            }
        }
        report
    }
}

fn reminder_intent(
    task: &Task,
    flag: ReminderFlag,
    recipient: crate::directory::domain::UserId,
    offset: FixedOffset,
) -> NotificationIntent {
    let due_local = task.due_date().with_timezone(&offset).format("%Y-%m-%d");
    let (kind, message) = match flag {
        ReminderFlag::DueSoon => (
            NotificationType::TaskDueSoon,
            format!("Task \"{}\" is due on {due_local}", task.title()),
        ),
        ReminderFlag::Overdue => (
            NotificationType::TaskOverdue,
            format!("Task \"{}\" is overdue (was due {due_local})", task.title()),
        ),
    };
    NotificationIntent::new(recipient, task.id(), kind, message)
        .with_link(format!("/task/{}", task.id()))
}

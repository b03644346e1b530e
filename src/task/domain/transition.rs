//! Pure status/approval state machine.
//!
//! The planner computes the full effect of a requested status change (the
//! resulting status, approval flag, completion timestamp, and the
//! notification events it implies) without touching persistence or
//! dispatch. Services apply the returned delta and hand the events to the
//! notification queue.

use super::{ActorClass, Task, TaskStatus};
use chrono::{DateTime, Utc};

/// The slice of task state the planner reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    /// Current workflow status.
    pub status: TaskStatus,
    /// Current approval flag.
    pub needs_completion_approval: bool,
    /// Current completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&Task> for StatusView {
    fn from(task: &Task) -> Self {
        Self {
            status: task.status(),
            needs_completion_approval: task.needs_completion_approval(),
            completed_at: task.completed_at(),
        }
    }
}

/// Notification events implied by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// A member reported completion; every Admin/Manager must be asked to
    /// approve it.
    ApprovalRequested,
    /// A privileged actor confirmed a pending completion.
    Approved,
    /// A privileged actor sent a pending completion back.
    Rejected,
}

/// The planned outcome of a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Resulting workflow status.
    pub status: TaskStatus,
    /// Resulting approval flag.
    pub needs_completion_approval: bool,
    /// Resulting completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Notification events the transition implies.
    pub events: Vec<TransitionEvent>,
}

impl TransitionPlan {
    const fn unchanged(current: StatusView) -> Self {
        Self {
            status: current.status,
            needs_completion_approval: current.needs_completion_approval,
            completed_at: current.completed_at,
            events: Vec::new(),
        }
    }

    /// Returns `true` when applying the plan would leave the task's status
    /// state exactly as it is.
    #[must_use]
    pub fn is_noop(&self, current: StatusView) -> bool {
        self.status == current.status
            && self.needs_completion_approval == current.needs_completion_approval
            && self.completed_at == current.completed_at
            && self.events.is_empty()
    }
}

/// Plans a status change requested by an actor of the given class.
///
/// Privileged actors set any status directly; their completions are
/// approved immediately, and acting on a pending-approval task turns the
/// change into an approval (status stays `Completed`) or a rejection (any
/// other status). Member completions enter the pending-approval state;
/// a member resubmitting the task's current status, including re-pinging a
/// completion that is already pending approval, plans to a no-op.
#[must_use]
pub fn plan_transition(
    current: StatusView,
    requested: TaskStatus,
    actor: ActorClass,
    now: DateTime<Utc>,
) -> TransitionPlan {
    match actor {
        ActorClass::Privileged => plan_privileged(current, requested, now),
        ActorClass::Member => plan_member(current, requested),
    }
}

fn plan_privileged(
    current: StatusView,
    requested: TaskStatus,
    now: DateTime<Utc>,
) -> TransitionPlan {
    let pending = current.needs_completion_approval;

    if requested == TaskStatus::Completed {
        if pending {
            // Confirming a member-reported completion.
            return TransitionPlan {
                status: TaskStatus::Completed,
                needs_completion_approval: false,
                completed_at: Some(now),
                events: vec![TransitionEvent::Approved],
            };
        }
        if current.status == TaskStatus::Completed {
            // Already approved complete; keep the original timestamp.
            return TransitionPlan::unchanged(current);
        }
        return TransitionPlan {
            status: TaskStatus::Completed,
            needs_completion_approval: false,
            completed_at: Some(now),
            events: Vec::new(),
        };
    }

    TransitionPlan {
        status: requested,
        needs_completion_approval: false,
        completed_at: None,
        events: if pending {
            vec![TransitionEvent::Rejected]
        } else {
            Vec::new()
        },
    }
}

fn plan_member(current: StatusView, requested: TaskStatus) -> TransitionPlan {
    if requested == current.status {
        return TransitionPlan::unchanged(current);
    }

    if requested == TaskStatus::Completed {
        return TransitionPlan {
            status: TaskStatus::Completed,
            needs_completion_approval: true,
            completed_at: None,
            events: vec![TransitionEvent::ApprovalRequested],
        };
    }

    TransitionPlan {
        status: requested,
        needs_completion_approval: false,
        completed_at: None,
        events: Vec::new(),
    }
}

//! Domain model for the task lifecycle engine.
//!
//! The task domain keeps the status/approval state machine, the field
//! permission policy, and the aggregate invariants free of infrastructure
//! concerns. All I/O happens in services and adapters.

mod actor;
mod command;
mod error;
mod ids;
mod task;
mod transition;

pub use actor::{Actor, ActorClass};
pub use command::{
    FieldPatch, MEMBER_FIELDS, PRIVILEGED_FIELDS, TaskCommand, TaskEdit, TaskField,
    UpdateRequestError, UpdateTaskRequest, allowed_fields,
};
pub use error::{ParseTaskStatusError, TaskDomainError, TaskPermissionError};
pub use ids::TaskId;
pub use task::{NewTaskData, PersistedTaskData, ReminderFlag, Task, TaskOwner, TaskStatus};
pub use transition::{StatusView, TransitionEvent, TransitionPlan, plan_transition};

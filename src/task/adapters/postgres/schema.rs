//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with assignment and reminder state.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Deadline.
        due_date -> Timestamptz,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Label set as a JSON array of strings.
        tags -> Jsonb,
        /// Direct assignee, exclusive with `team_id`.
        assignee_id -> Nullable<Uuid>,
        /// Owning team, exclusive with `assignee_id`.
        team_id -> Nullable<Uuid>,
        /// Approved completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Member-reported completion awaiting approval.
        needs_completion_approval -> Bool,
        /// Due-soon reminder latch.
        due_reminder_sent -> Bool,
        /// Overdue reminder latch.
        overdue_reminder_sent -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

//! Diesel schema for notification persistence.

diesel::table! {
    /// Per-recipient notification records.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Recipient user.
        recipient_id -> Uuid,
        /// Related task; may dangle after task deletion.
        task_id -> Uuid,
        /// Notification type.
        #[max_length = 50]
        kind -> Varchar,
        /// Read state.
        #[max_length = 20]
        status -> Varchar,
        /// Message text.
        message -> Text,
        /// Optional in-app link.
        #[max_length = 255]
        link -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

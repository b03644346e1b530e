//! `PostgreSQL` repository implementation for notification storage.

use super::{
    models::{NewNotificationRow, NotificationRow},
    schema::notifications,
};
use crate::directory::domain::UserId;
use crate::notification::{
    domain::{
        Notification, NotificationId, NotificationStatus, NotificationType,
        PersistedNotificationData,
    },
    ports::{
        NotificationPage, NotificationQuery, NotificationRepository, NotificationRepositoryError,
        NotificationRepositoryResult,
    },
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by notification adapters.
pub type NotificationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed notification repository.
#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: NotificationPgPool,
}

impl PostgresNotificationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: NotificationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> NotificationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NotificationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(NotificationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(NotificationRepositoryError::persistence)?
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let row = to_row(notification);
        self.run_blocking(move |connection| {
            diesel::insert_into(notifications::table)
                .values(&row)
                .execute(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        self.run_blocking(move |connection| {
            let row = notifications::table
                .filter(notifications::id.eq(id.into_inner()))
                .select(NotificationRow::as_select())
                .first::<NotificationRow>(connection)
                .optional()
                .map_err(NotificationRepositoryError::persistence)?;
            row.map(row_to_notification).transpose()
        })
        .await
    }

    async fn list_for_user(
        &self,
        recipient: UserId,
        query: NotificationQuery,
    ) -> NotificationRepositoryResult<NotificationPage> {
        let normalized = query.normalized();
        self.run_blocking(move |connection| {
            let base = notifications::table
                .filter(notifications::recipient_id.eq(recipient.into_inner()));
            let raw_total = match normalized.status {
                Some(status) => base
                    .filter(notifications::status.eq(status.as_str().to_owned()))
                    .count()
                    .get_result::<i64>(connection),
                None => base.count().get_result::<i64>(connection),
            }
            .map_err(NotificationRepositoryError::persistence)?;
            let total = u64::try_from(raw_total).unwrap_or(0);

            let mut page_query = notifications::table
                .select(NotificationRow::as_select())
                .into_boxed()
                .filter(notifications::recipient_id.eq(recipient.into_inner()));
            if let Some(status) = normalized.status {
                page_query =
                    page_query.filter(notifications::status.eq(status.as_str().to_owned()));
            }

            let offset = i64::try_from(normalized.offset()).unwrap_or(i64::MAX);
            let limit = i64::from(normalized.limit);
            let rows = page_query
                .order(notifications::created_at.desc())
                .offset(offset)
                .limit(limit)
                .load::<NotificationRow>(connection)
                .map_err(NotificationRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_notification)
                .collect::<NotificationRepositoryResult<Vec<Notification>>>()?;
            Ok(NotificationPage { items, total })
        })
        .await
    }

    async fn update(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let id = notification.id();
        let row = to_row(notification);
        self.run_blocking(move |connection| {
            let updated = diesel::update(notifications::table.filter(notifications::id.eq(row.id)))
                .set(&row)
                .execute(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            if updated == 0 {
                return Err(NotificationRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: NotificationId) -> NotificationRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                notifications::table.filter(notifications::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(NotificationRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(NotificationRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_row(notification: &Notification) -> NewNotificationRow {
    NewNotificationRow {
        id: notification.id().into_inner(),
        recipient_id: notification.recipient().into_inner(),
        task_id: notification.task_id().into_inner(),
        kind: notification.kind().as_str().to_owned(),
        status: notification.status().as_str().to_owned(),
        message: notification.message().to_owned(),
        link: notification.link().map(str::to_owned),
        created_at: notification.created_at(),
    }
}

fn row_to_notification(row: NotificationRow) -> NotificationRepositoryResult<Notification> {
    let kind = NotificationType::try_from(row.kind.as_str())
        .map_err(NotificationRepositoryError::persistence)?;
    let status = NotificationStatus::try_from(row.status.as_str())
        .map_err(NotificationRepositoryError::persistence)?;

    Ok(Notification::from_persisted(PersistedNotificationData {
        id: NotificationId::from_uuid(row.id),
        recipient: UserId::from_uuid(row.recipient_id),
        task_id: TaskId::from_uuid(row.task_id),
        kind,
        status,
        message: row.message,
        link: row.link,
        created_at: row.created_at,
    }))
}

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewNotification, Notification};
use crate::types::{CursorPage, CursorPagination};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for in-app notifications.
pub trait NotificationRepository {
    fn create_notification(
        &mut self,
        notification: NewNotification,
    ) -> impl Future<Output = PgResult<Notification>> + Send;

    /// Inserts several notifications at once and returns how many were written.
    fn create_notifications(
        &mut self,
        notifications: Vec<NewNotification>,
    ) -> impl Future<Output = PgResult<usize>> + Send;

    fn list_account_notifications(
        &mut self,
        account_id: Uuid,
        unread_only: bool,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<Notification>>> + Send;

    /// Marks one notification of the account read.
    fn mark_notification_read(
        &mut self,
        notification_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Notification>>> + Send;

    /// Marks every unread notification of the account read.
    fn mark_all_notifications_read(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl NotificationRepository for PgConnection {
    async fn create_notification(&mut self, notification: NewNotification) -> PgResult<Notification> {
        use schema::notifications;

        diesel::insert_into(notifications::table)
            .values(&notification)
            .returning(Notification::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn create_notifications(&mut self, batch: Vec<NewNotification>) -> PgResult<usize> {
        use schema::notifications;

        if batch.is_empty() {
            return Ok(0);
        }

        diesel::insert_into(notifications::table)
            .values(&batch)
            .execute(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_account_notifications(
        &mut self,
        owner: Uuid,
        unread_only: bool,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<Notification>> {
        use schema::notifications::dsl::*;

        let mut query = notifications.filter(account_id.eq(owner)).into_boxed();
        if unread_only {
            query = query.filter(is_read.eq(false));
        }

        if let Some(cursor) = pagination.after {
            let cursor_ts = jiff_diesel::Timestamp::from(cursor.timestamp);
            query = query.filter(
                created_at
                    .lt(cursor_ts)
                    .or(created_at.eq(cursor_ts).and(id.lt(cursor.id))),
            );
        }

        let items = query
            .select(Notification::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |notification| {
            (notification.created_at.into(), notification.id)
        }))
    }

    async fn mark_notification_read(
        &mut self,
        notification_id: Uuid,
        owner: Uuid,
    ) -> PgResult<Option<Notification>> {
        use schema::notifications::dsl::*;

        diesel::update(notifications)
            .filter(id.eq(notification_id))
            .filter(account_id.eq(owner))
            .set(is_read.eq(true))
            .returning(Notification::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn mark_all_notifications_read(&mut self, owner: Uuid) -> PgResult<usize> {
        use schema::notifications::dsl::*;

        diesel::update(notifications)
            .filter(account_id.eq(owner))
            .filter(is_read.eq(false))
            .set(is_read.eq(true))
            .execute(self)
            .await
            .map_err(PgError::from)
    }
}

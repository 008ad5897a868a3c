//! Notification inbox handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::query::NotificationRepository;
use validator::Validate;

use crate::extract::{AuthState, Json, Path, PgPool, Query};
use crate::handler::request::{CursorQuery, NotificationListFilter, NotificationPathParams};
use crate::handler::response::{ErrorResponse, MarkedRead, Notification, Page};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for notification operations.
const TRACING_TARGET: &str = "hospice_server::handler::notifications";

/// Lists the caller's notifications.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_notifications(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(query): Query<CursorQuery>,
    Query(filter): Query<NotificationListFilter>,
) -> Result<(StatusCode, Json<Page<Notification>>)> {
    query.validate()?;

    let page = conn
        .list_account_notifications(
            auth_state.account_id,
            filter.unread_only,
            query.into_pagination()?,
        )
        .await?;

    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, Notification::from))))
}

fn list_notifications_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List notifications")
        .description("Lists the caller's notifications newest first. `unreadOnly` hides read ones.")
        .response::<200, Json<Page<Notification>>>()
}

/// Marks one notification read.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, notification_id = %path_params.notification_id))]
async fn mark_notification_read(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<NotificationPathParams>,
) -> Result<(StatusCode, Json<Notification>)> {
    // Another account's notification is reported as missing.
    let notification = conn
        .mark_notification_read(path_params.notification_id, auth_state.account_id)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Notification not found")
                .with_resource("notification")
        })?;

    Ok((StatusCode::OK, Json(notification.into())))
}

fn mark_notification_read_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Mark notification read")
        .response::<200, Json<Notification>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Marks every notification of the caller read.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn mark_all_read(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<MarkedRead>)> {
    let updated = conn.mark_all_notifications_read(auth_state.account_id).await?;

    tracing::debug!(target: TRACING_TARGET, updated, "notifications marked read");
    Ok((StatusCode::OK, Json(MarkedRead { updated })))
}

fn mark_all_read_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Mark all notifications read")
        .description("Marks every unread notification read and returns how many changed.")
        .response::<200, Json<MarkedRead>>()
}

/// Returns routes for the notification inbox.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/notifications",
            get_with(list_notifications, list_notifications_docs),
        )
        .api_route(
            "/notifications/read-all",
            post_with(mark_all_read, mark_all_read_docs),
        )
        .api_route(
            "/notifications/{notificationId}/read",
            post_with(mark_notification_read, mark_notification_read_docs),
        )
        .with_path_items(|item| item.tag("Notifications"))
}

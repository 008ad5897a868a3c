//! Inbound event webhook.
//!
//! External systems post `{event, data}` to create one notification. The
//! body is checked before a database connection is taken, and when a
//! webhook secret is configured the signature headers are checked first.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use hospice_postgres::PgClient;
use hospice_postgres::query::NotificationRepository;

use crate::extract::{Json, WebhookSignature};
use crate::handler::Result;
use crate::handler::request::WebhookEvent;
use crate::handler::response::{ErrorResponse, WebhookAccepted};
use crate::service::{PortalSettings, ServiceState};

/// Tracing target for webhook operations.
const TRACING_TARGET: &str = "hospice_server::handler::webhooks";

/// Turns an inbound event into a notification.
#[tracing::instrument(skip_all, fields(signed = settings.webhook_secret.is_some()))]
async fn receive_event(
    State(pg_client): State<PgClient>,
    State(settings): State<PortalSettings>,
    signature: WebhookSignature,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookAccepted>)> {
    if let Some(secret) = settings.webhook_secret.as_deref() {
        signature.verify(secret, &body)?;
    }

    let notification = WebhookEvent::from_slice(&body)?.into_notification()?;

    let mut conn = pg_client.get_connection().await?;
    let notification = conn.create_notification(notification).await?;

    tracing::info!(
        target: TRACING_TARGET,
        notification_id = %notification.id,
        event = %notification.event,
        "webhook event accepted"
    );

    let response = WebhookAccepted {
        notification_id: notification.id,
    };
    Ok((StatusCode::ACCEPTED, Json(response)))
}

fn receive_event_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Receive event")
        .description(
            "Creates one notification for `data.accountId`. Accepted events: \
             `visit_scheduled`, `visit_completed`, `message_received`, `delivery_updated`, \
             `supply_fulfilled`. With a webhook secret configured, `X-Hospice-Timestamp` and \
             `X-Hospice-Signature` (hex HMAC-SHA256 of `{timestamp}.{body}`) are required.",
        )
        .input::<Json<WebhookEvent>>()
        .response::<202, Json<WebhookAccepted>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns routes for inbound webhooks.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/webhooks/events", post_with(receive_event, receive_event_docs))
        .with_path_items(|item| item.tag("Webhooks"))
}

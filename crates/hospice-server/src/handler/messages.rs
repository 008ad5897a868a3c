//! Direct, patient-scoped messages between the care team and family.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::model::{NewNotification, Patient};
use hospice_postgres::query::{
    AgencyUserRepository, FamilyMemberRepository, MessageRepository, NotificationRepository,
};
use hospice_postgres::types::NotificationEvent;
use hospice_postgres::PgConn;
use uuid::Uuid;
use validator::Validate;

use crate::extract::{AuthProvider, AuthState, Json, Path, Permission, PgPool, Query, ValidateJson};
use crate::handler::request::{CursorQuery, MessagePathParams, PatientPathParams, SendMessage};
use crate::handler::response::{ErrorResponse, Message, Page};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for direct message operations.
const TRACING_TARGET: &str = "hospice_server::handler::messages";

/// Longest message excerpt placed in a notification body.
const PREVIEW_CHARS: usize = 140;

/// Checks that `recipient_id` sits on the other side of the conversation.
///
/// Family members write to the patient's agency; everyone else writes to
/// the patient's family.
async fn ensure_recipient(
    conn: &mut PgConn,
    auth_state: &impl AuthProvider,
    patient: &Patient,
    recipient_id: Uuid,
) -> Result<()> {
    if recipient_id == auth_state.account_id() {
        return Err(ErrorKind::BadRequest
            .with_message("You cannot message yourself")
            .with_resource("recipientId"));
    }

    let reachable = if auth_state.role().is_family() {
        conn.find_agency_member(patient.agency_id, recipient_id)
            .await?
            .is_some()
    } else {
        conn.find_family_link(patient.id, recipient_id)
            .await?
            .is_some()
    };

    if reachable {
        return Ok(());
    }

    Err(ErrorKind::BadRequest
        .with_message("The recipient is not part of this patient's care conversation")
        .with_resource("recipientId"))
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(PREVIEW_CHARS) {
        Some((index, _)) => format!("{}...", &body[..index]),
        None => body.to_owned(),
    }
}

/// Sends a direct message and notifies the recipient.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, patient_id = %path_params.patient_id))]
async fn send_message(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<PatientPathParams>,
    ValidateJson(request): ValidateJson<SendMessage>,
) -> Result<(StatusCode, Json<Message>)> {
    let patient = auth_state
        .authorize_patient(&mut conn, path_params.patient_id, Permission::SendMessages)
        .await?;
    ensure_recipient(&mut conn, &auth_state, &patient, request.recipient_id).await?;

    let new_message = request.into_model(patient.agency_id, patient.id, auth_state.account_id);
    let patient_name = patient.full_name();

    let message = conn
        .transaction(|conn| {
            Box::pin(async move {
                let message = conn.create_message(new_message).await?;
                let notification =
                    NewNotification::new(message.recipient_id, NotificationEvent::MessageReceived)
                        .with_agency(message.agency_id)
                        .with_body(preview(&message.body))
                        .with_payload(serde_json::json!({
                            "messageId": message.id,
                            "patientId": message.patient_id,
                            "patientName": patient_name,
                            "senderId": message.sender_id,
                        }));
                conn.create_notification(notification).await?;
                Ok::<_, Error<'static>>(message)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        message_id = %message.id,
        recipient_id = %message.recipient_id,
        "message sent"
    );

    Ok((StatusCode::CREATED, Json(message.into())))
}

fn send_message_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Send message")
        .description(
            "Sends a direct message about the patient. Staff write to a linked family member \
             and family members write to a member of the agency. The recipient is notified.",
        )
        .response::<201, Json<Message>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists direct messages about a patient.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, patient_id = %path_params.patient_id))]
async fn list_messages(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<PatientPathParams>,
    Query(query): Query<CursorQuery>,
) -> Result<(StatusCode, Json<Page<Message>>)> {
    query.validate()?;
    let patient = auth_state
        .authorize_patient(&mut conn, path_params.patient_id, Permission::ViewMessages)
        .await?;

    // Family members only see their own conversations.
    let participant = auth_state.role().is_family().then_some(auth_state.account_id);
    let page = conn
        .list_patient_messages(patient.id, participant, query.into_pagination()?)
        .await?;

    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, Message::from))))
}

fn list_messages_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List messages")
        .description(
            "Lists direct messages about the patient, newest first. Family members only see \
             messages they sent or received.",
        )
        .response::<200, Json<Page<Message>>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Marks a message read. Only its recipient may do so.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, message_id = %path_params.message_id))]
async fn mark_message_read(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MessagePathParams>,
) -> Result<(StatusCode, Json<Message>)> {
    let message_id = path_params.message_id;
    if let Some(message) = conn
        .mark_message_read(message_id, auth_state.account_id)
        .await?
    {
        return Ok((StatusCode::OK, Json(message.into())));
    }

    match conn.find_message_by_id(message_id).await? {
        Some(_) => Err(ErrorKind::Forbidden
            .with_message("Only the recipient can mark a message read")
            .with_resource("message")),
        None => Err(ErrorKind::NotFound
            .with_message("Message not found")
            .with_resource("message")),
    }
}

fn mark_message_read_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Mark message read")
        .description("Marks the message read. Repeating the call keeps the first read time.")
        .response::<200, Json<Message>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for direct messages.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/patients/{patientId}/messages",
            post_with(send_message, send_message_docs).get_with(list_messages, list_messages_docs),
        )
        .api_route(
            "/messages/{messageId}/read",
            post_with(mark_message_read, mark_message_read_docs),
        )
        .with_path_items(|item| item.tag("Messages"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previews_are_cut_on_char_boundaries() {
        assert_eq!(preview("short"), "short");

        let long = "é".repeat(PREVIEW_CHARS + 10);
        let cut = preview(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
    }
}

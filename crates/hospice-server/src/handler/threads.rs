//! Multi-party message threads.
//!
//! Only participants can read or post. Posting bumps the thread and
//! notifies the other participants; `last_read_at` of each participant is
//! the read receipt behind the unread counts.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::model::{
    MessageThread, NewMessageThread, NewNotification, NewThreadMessage,
    ThreadMessage as ThreadMessageModel,
};
use hospice_postgres::query::{
    AgencyUserRepository, FamilyMemberRepository, MessageThreadRepository, NotificationRepository,
};
use hospice_postgres::types::NotificationEvent;
use hospice_postgres::{PgConn, PgConnection, PgResult};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{
    AccessScope, AuthProvider, AuthState, Json, Path, Permission, PgPool, Query, ValidateJson,
};
use crate::handler::request::{CreateThread, CursorQuery, PostThreadMessage, ThreadPathParams};
use crate::handler::response::{
    ErrorResponse, Page, Thread, ThreadDetails, ThreadMessage, ThreadReadMarker,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for thread operations.
const TRACING_TARGET: &str = "hospice_server::handler::threads";

fn thread_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("Thread not found")
        .with_resource("thread")
}

/// Loads the thread when `account_id` participates in it.
async fn participating_thread(
    conn: &mut PgConn,
    thread_id: Uuid,
    account_id: Uuid,
) -> Result<MessageThread> {
    let thread = conn
        .find_thread_by_id(thread_id)
        .await?
        .ok_or_else(thread_not_found)?;

    if conn.find_thread_participant(thread_id, account_id).await?.is_none() {
        return Err(ErrorKind::Forbidden
            .with_message("You are not a participant of this thread")
            .with_resource("thread"));
    }

    Ok(thread)
}

/// Stores a message and notifies every other participant.
async fn post_message(
    conn: &mut PgConnection,
    thread: &MessageThread,
    sender_id: Uuid,
    body: String,
) -> PgResult<ThreadMessageModel> {
    let message = conn
        .create_thread_message(NewThreadMessage {
            thread_id: thread.id,
            sender_id,
            body,
        })
        .await?;

    let recipients = conn.list_thread_participant_ids(thread.id).await?;
    let notifications = recipients
        .into_iter()
        .filter(|account_id| *account_id != sender_id)
        .map(|account_id| {
            NewNotification::new(account_id, NotificationEvent::MessageReceived)
                .with_agency(thread.agency_id)
                .with_title(format!("New message in \"{}\"", thread.subject))
                .with_payload(serde_json::json!({
                    "threadId": thread.id,
                    "messageId": message.id,
                    "senderId": sender_id,
                }))
        })
        .collect::<Vec<_>>();

    if !notifications.is_empty() {
        conn.create_notifications(notifications).await?;
    }
    conn.mark_thread_read(thread.id, sender_id).await?;

    Ok(message)
}

/// Agency the new thread belongs to.
///
/// A thread about a patient belongs to the patient's agency. Otherwise the
/// creator's own agency is used, which family members and super admins
/// do not have.
async fn thread_agency(
    conn: &mut PgConn,
    auth_state: &impl AuthProvider,
    patient_id: Option<Uuid>,
) -> Result<Uuid> {
    if let Some(patient_id) = patient_id {
        let patient = auth_state
            .authorize_patient(conn, patient_id, Permission::SendMessages)
            .await?;
        return Ok(patient.agency_id);
    }

    match auth_state.access_scope(conn).await? {
        AccessScope::Agency(member) => Ok(member.agency_id),
        AccessScope::Platform | AccessScope::Family(_) => Err(ErrorKind::BadRequest
            .with_message("A thread outside your agency must name a patient")
            .with_resource("patientId")),
    }
}

/// Requires every participant to be in the agency or linked to the patient.
async fn ensure_participants(
    conn: &mut PgConn,
    agency_id: Uuid,
    patient_id: Option<Uuid>,
    participants: &[Uuid],
) -> Result<()> {
    for &account_id in participants {
        if conn.find_agency_member(agency_id, account_id).await?.is_some() {
            continue;
        }

        let linked = match patient_id {
            Some(patient_id) => conn.find_family_link(patient_id, account_id).await?.is_some(),
            None => false,
        };
        if !linked {
            return Err(ErrorKind::BadRequest
                .with_message(format!("Account {account_id} cannot join this thread"))
                .with_resource("participantIds"));
        }
    }

    Ok(())
}

/// Starts a thread with the creator as a participant.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn create_thread(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateThread>,
) -> Result<(StatusCode, Json<ThreadDetails>)> {
    let creator_id = auth_state.account_id;
    let agency_id = thread_agency(&mut conn, &auth_state, request.patient_id).await?;

    let participants = request.participants(creator_id);
    ensure_participants(&mut conn, agency_id, request.patient_id, &participants[1..]).await?;

    let new_thread = NewMessageThread {
        agency_id,
        patient_id: request.patient_id,
        subject: request.subject.trim().to_owned(),
        created_by: creator_id,
    };
    let body = request.body.map(|body| body.trim().to_owned());
    let participant_ids = participants.clone();

    let thread = conn
        .transaction(|conn| {
            Box::pin(async move {
                let thread = conn.create_thread(new_thread).await?;
                conn.add_thread_participants(thread.id, participants).await?;
                if let Some(body) = body {
                    post_message(conn, &thread, creator_id, body).await?;
                }
                Ok::<_, Error<'static>>(thread)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        thread_id = %thread.id,
        participants = participant_ids.len(),
        "thread created"
    );

    let details = ThreadDetails {
        thread: Thread::new(thread, 0),
        participant_ids,
    };
    Ok((StatusCode::CREATED, Json(details)))
}

fn create_thread_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create thread")
        .description(
            "Starts a conversation, optionally about a patient and with a first message. \
             Participants must belong to the agency or, for a patient thread, to the \
             patient's family.",
        )
        .response::<201, Json<ThreadDetails>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists the caller's threads with unread counts.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_threads(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(query): Query<CursorQuery>,
) -> Result<(StatusCode, Json<Page<Thread>>)> {
    query.validate()?;

    let page = conn
        .list_account_threads(auth_state.account_id, query.into_pagination()?)
        .await?;

    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, Thread::from))))
}

fn list_threads_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List threads")
        .description("Lists threads the caller participates in, most recently active first.")
        .response::<200, Json<Page<Thread>>>()
}

/// Lists messages of a thread.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, thread_id = %path_params.thread_id))]
async fn list_thread_messages(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ThreadPathParams>,
    Query(query): Query<CursorQuery>,
) -> Result<(StatusCode, Json<Page<ThreadMessage>>)> {
    query.validate()?;
    let thread = participating_thread(&mut conn, path_params.thread_id, auth_state.account_id).await?;

    let page = conn
        .list_thread_messages(thread.id, query.into_pagination()?)
        .await?;

    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, ThreadMessage::from))))
}

fn list_thread_messages_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List thread messages")
        .description("Lists the thread's messages, newest first. Participants only.")
        .response::<200, Json<Page<ThreadMessage>>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Posts a message in a thread.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, thread_id = %path_params.thread_id))]
async fn post_thread_message(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ThreadPathParams>,
    ValidateJson(request): ValidateJson<PostThreadMessage>,
) -> Result<(StatusCode, Json<ThreadMessage>)> {
    let sender_id = auth_state.account_id;
    let thread = participating_thread(&mut conn, path_params.thread_id, sender_id).await?;
    let body = request.body.trim().to_owned();

    let message = conn
        .transaction(|conn| {
            Box::pin(async move {
                let message = post_message(conn, &thread, sender_id, body).await?;
                Ok::<_, Error<'static>>(message)
            })
        })
        .await?;

    tracing::info!(target: TRACING_TARGET, message_id = %message.id, "thread message posted");
    Ok((StatusCode::CREATED, Json(message.into())))
}

fn post_thread_message_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Post thread message")
        .description("Posts in the thread and notifies the other participants.")
        .response::<201, Json<ThreadMessage>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Moves the caller's read receipt to now.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, thread_id = %path_params.thread_id))]
async fn mark_thread_read(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<ThreadPathParams>,
) -> Result<(StatusCode, Json<ThreadReadMarker>)> {
    let thread_id = path_params.thread_id;
    if let Some(participant) = conn
        .mark_thread_read(thread_id, auth_state.account_id)
        .await?
    {
        return Ok((StatusCode::OK, Json(participant.into())));
    }

    match conn.find_thread_by_id(thread_id).await? {
        Some(_) => Err(ErrorKind::Forbidden
            .with_message("You are not a participant of this thread")
            .with_resource("thread")),
        None => Err(thread_not_found()),
    }
}

fn mark_thread_read_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Mark thread read")
        .description("Marks every message in the thread as read for the caller.")
        .response::<200, Json<ThreadReadMarker>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for message threads.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/threads",
            post_with(create_thread, create_thread_docs).get_with(list_threads, list_threads_docs),
        )
        .api_route(
            "/threads/{threadId}/messages",
            get_with(list_thread_messages, list_thread_messages_docs)
                .post_with(post_thread_message, post_thread_message_docs),
        )
        .api_route(
            "/threads/{threadId}/read",
            post_with(mark_thread_read, mark_thread_read_docs),
        )
        .with_path_items(|item| item.tag("Threads"))
}

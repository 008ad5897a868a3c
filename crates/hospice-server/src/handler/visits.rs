//! Visit scheduling handlers.
//!
//! Visit bodies carry ids as strings and are parsed before a connection is
//! taken from the pool, so a malformed id is a 400 even when the database
//! is unreachable.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hospice_postgres::model::{Patient, Visit as VisitModel};
use hospice_postgres::query::{AgencyUserRepository, VisitFilter, VisitRepository};
use hospice_postgres::types::{NotificationEvent, VisitStatus};
use hospice_postgres::{PgClient, PgConn};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{
    AuthHeader, AuthProvider, AuthState, Json, Path, Permission, PgPool, Query, ValidateJson,
};
use crate::handler::request::{CreateVisit, CursorQuery, UpdateVisit, VisitListFilter, VisitPathParams};
use crate::handler::response::{ErrorResponse, Page, Visit};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{FamilyNotice, ServiceState, notify_family};

/// Tracing target for visit operations.
const TRACING_TARGET: &str = "hospice_server::handler::visits";

fn visit_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("Visit not found")
        .with_resource("visit")
}

/// Requires the assignee to be a member of the patient's agency.
async fn ensure_assignee(conn: &mut PgConn, patient: &Patient, staff_account_id: Uuid) -> Result<()> {
    if conn
        .find_agency_member(patient.agency_id, staff_account_id)
        .await?
        .is_some()
    {
        return Ok(());
    }

    Err(ErrorKind::BadRequest
        .with_message("The assigned staff member does not belong to the patient's agency")
        .with_resource("staffAccountId"))
}

/// Family notice for a visit that is now in `status`, if any.
fn visit_notice(visit: &VisitModel) -> Option<FamilyNotice> {
    let event = match visit.status {
        VisitStatus::Scheduled => NotificationEvent::VisitScheduled,
        VisitStatus::Completed => NotificationEvent::VisitCompleted,
        VisitStatus::Cancelled | VisitStatus::Missed => return None,
    };

    let notice = FamilyNotice::new(event).with_payload(serde_json::json!({
        "visitId": visit.id,
        "visitType": visit.visit_type,
        "scheduledAt": jiff::Timestamp::from(visit.scheduled_at),
    }));

    Some(notice)
}

/// Schedules or records a visit.
#[tracing::instrument(skip_all, fields(account_id = %auth_claims.account_id))]
async fn create_visit(
    State(pg_client): State<PgClient>,
    AuthHeader(auth_claims): AuthHeader,
    ValidateJson(request): ValidateJson<CreateVisit>,
) -> Result<(StatusCode, Json<Visit>)> {
    let refs = request.refs()?;

    let mut conn = pg_client.get_connection().await?;
    let AuthState(auth_state) = AuthState::verify(&mut conn, auth_claims).await?;

    let patient = auth_state
        .authorize_patient(&mut conn, refs.patient_id, Permission::ManageVisits)
        .await?;
    if let Some(staff_account_id) = refs.staff_account_id {
        ensure_assignee(&mut conn, &patient, staff_account_id).await?;
    }

    let new_visit = request.into_model(patient.agency_id, refs, auth_state.account_id)?;
    let (visit, notified) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let visit = conn.create_visit(new_visit).await?;
                let notified = match visit_notice(&visit) {
                    Some(notice) => notify_family(conn, &patient, notice).await?,
                    None => 0,
                };
                Ok::<_, Error<'static>>((visit, notified))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        visit_id = %visit.id,
        status = %visit.status,
        notified,
        "visit created"
    );

    Ok((StatusCode::CREATED, Json(visit.into())))
}

fn create_visit_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create visit")
        .description(
            "Schedules a visit, or records one that already happened. A completed visit without \
             `completedAt` is completed now. The patient's family is notified.",
        )
        .response::<201, Json<Visit>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists visits the caller may see.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_visits(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(query): Query<CursorQuery>,
    Query(filter): Query<VisitListFilter>,
) -> Result<(StatusCode, Json<Page<Visit>>)> {
    query.validate()?;
    let patient_id = filter.patient_id()?;

    let scope = auth_state
        .list_filter(&mut conn, patient_id, Permission::ViewVisits)
        .await?;
    let filter = VisitFilter {
        agency_id: scope.agency_id,
        patient_ids: scope.patient_ids,
        status: filter.status,
    };

    let page = conn.list_visits(filter, query.into_pagination()?).await?;
    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, Visit::from))))
}

fn list_visits_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List visits")
        .description(
            "Lists visits newest first, optionally for one patient or with one status. Without \
             a patient, staff see their agency and family members see their patients.",
        )
        .response::<200, Json<Page<Visit>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns a visit.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, visit_id = %path_params.visit_id))]
async fn read_visit(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<VisitPathParams>,
) -> Result<(StatusCode, Json<Visit>)> {
    let visit = conn
        .find_visit_by_id(path_params.visit_id)
        .await?
        .ok_or_else(visit_not_found)?;

    auth_state
        .authorize_patient(&mut conn, visit.patient_id, Permission::ViewVisits)
        .await?;

    Ok((StatusCode::OK, Json(visit.into())))
}

fn read_visit_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get visit")
        .response::<200, Json<Visit>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Reschedules, reassigns or changes the status of a visit.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, visit_id = %path_params.visit_id))]
async fn update_visit(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<VisitPathParams>,
    ValidateJson(request): ValidateJson<UpdateVisit>,
) -> Result<(StatusCode, Json<Visit>)> {
    if request.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("The request changes nothing")
            .with_resource("visit"));
    }
    let assignment = request.staff_assignment()?;

    let visit = conn
        .find_visit_by_id(path_params.visit_id)
        .await?
        .ok_or_else(visit_not_found)?;
    let patient = auth_state
        .authorize_patient(&mut conn, visit.patient_id, Permission::ManageVisits)
        .await?;
    if let Some(Some(staff_account_id)) = assignment {
        ensure_assignee(&mut conn, &patient, staff_account_id).await?;
    }

    let changes = request.into_model(&visit)?;
    let previous_status = visit.status;

    let (visit, notified) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let updated = conn.update_visit(visit.id, changes).await?;
                let notice = (updated.status != previous_status)
                    .then(|| visit_notice(&updated))
                    .flatten();
                let notified = match notice {
                    Some(notice) => notify_family(conn, &patient, notice).await?,
                    None => 0,
                };
                Ok::<_, Error<'static>>((updated, notified))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        status = %visit.status,
        notified,
        "visit updated"
    );

    Ok((StatusCode::OK, Json(visit.into())))
}

fn update_visit_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update visit")
        .description(
            "Updates the visit. `completedAt` is only accepted for completed visits; completing \
             a visit without one sets it to now. An empty `staffAccountId` unassigns the visit.",
        )
        .response::<200, Json<Visit>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for visits.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/visits",
            post_with(create_visit, create_visit_docs).get_with(list_visits, list_visits_docs),
        )
        .api_route(
            "/visits/{visitId}",
            get_with(read_visit, read_visit_docs).patch_with(update_visit, update_visit_docs),
        )
        .with_path_items(|item| item.tag("Visits"))
}

#[cfg(test)]
mod tests {
    use hospice_postgres::types::VisitType;

    use super::*;

    fn visit(status: VisitStatus) -> VisitModel {
        let now = jiff::Timestamp::now();
        VisitModel {
            id: Uuid::new_v4(),
            agency_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            staff_account_id: None,
            visit_type: VisitType::Chaplain,
            status,
            scheduled_at: now.into(),
            completed_at: None,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn family_hears_about_scheduled_and_completed_visits() {
        let scheduled = visit_notice(&visit(VisitStatus::Scheduled)).map(|notice| notice.event);
        assert_eq!(scheduled, Some(NotificationEvent::VisitScheduled));

        let completed = visit_notice(&visit(VisitStatus::Completed)).map(|notice| notice.event);
        assert_eq!(completed, Some(NotificationEvent::VisitCompleted));

        assert!(visit_notice(&visit(VisitStatus::Missed)).is_none());
        assert!(visit_notice(&visit(VisitStatus::Cancelled)).is_none());
    }
}

//! Patient record handlers.
//!
//! Patients belong to one agency. Agency members work with the patients of
//! their agency; family members only see the patients they are linked to.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::model::NewAuditLog;
use hospice_postgres::query::{AuditLogRepository, FamilyMemberRepository, PatientRepository};
use validator::Validate;

use crate::extract::{AuthProvider, AuthState, Json, Path, Permission, PgPool, Query, ValidateJson};
use crate::handler::request::{
    AgencyPathParams, CreatePatient, CursorQuery, PatientFilter, PatientPathParams, UpdatePatient,
};
use crate::handler::response::{ErrorResponse, FamilyMember, Page, Patient};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for patient operations.
const TRACING_TARGET: &str = "hospice_server::handler::patients";

/// Admits a patient to an agency.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn create_patient(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
    ValidateJson(request): ValidateJson<CreatePatient>,
) -> Result<(StatusCode, Json<Patient>)> {
    let agency_id = path_params.agency_id;
    auth_state
        .authorize_agency(&mut conn, agency_id, Permission::ManagePatients)
        .await?;

    let new_patient = request.into_model(agency_id);
    let actor_id = auth_state.account_id;

    let patient = conn
        .transaction(|conn| {
            Box::pin(async move {
                let patient = conn.create_patient(new_patient).await?;
                conn.create_audit_log(
                    NewAuditLog::new("patient.create", "patient")
                        .agency(agency_id)
                        .actor(actor_id)
                        .target(patient.id),
                )
                .await?;
                Ok::<_, Error<'static>>(patient)
            })
        })
        .await?;

    tracing::info!(target: TRACING_TARGET, patient_id = %patient.id, "patient admitted");
    Ok((StatusCode::CREATED, Json(patient.into())))
}

fn create_patient_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create patient")
        .description("Admits a patient to the agency. The medical record number is unique per agency.")
        .response::<201, Json<Patient>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Lists the patients of an agency the caller may see.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn list_patients(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
    Query(query): Query<CursorQuery>,
    Query(filter): Query<PatientFilter>,
) -> Result<(StatusCode, Json<Page<Patient>>)> {
    query.validate()?;
    let agency_id = path_params.agency_id;

    if auth_state.role().is_family() {
        let patients = conn
            .list_family_patients(auth_state.account_id)
            .await?
            .into_iter()
            .filter(|patient| patient.agency_id == agency_id)
            .filter(|patient| filter.status.is_none_or(|status| patient.status == status))
            .map(Patient::from)
            .collect();

        return Ok((StatusCode::OK, Json(Page::complete(patients))));
    }

    auth_state
        .authorize_agency(&mut conn, agency_id, Permission::ViewPatients)
        .await?;

    let page = conn
        .list_agency_patients(agency_id, filter.status, query.into_pagination()?)
        .await?;

    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, Patient::from))))
}

fn list_patients_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List patients")
        .description(
            "Lists the agency's patients, newest first, optionally by status. Family members \
             only get the patients they are linked to.",
        )
        .response::<200, Json<Page<Patient>>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns a patient record.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, patient_id = %path_params.patient_id))]
async fn read_patient(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<PatientPathParams>,
) -> Result<(StatusCode, Json<Patient>)> {
    let patient = auth_state
        .authorize_patient(&mut conn, path_params.patient_id, Permission::ViewPatients)
        .await?;

    Ok((StatusCode::OK, Json(patient.into())))
}

fn read_patient_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get patient")
        .description("Returns the patient record.")
        .response::<200, Json<Patient>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates a patient record.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, patient_id = %path_params.patient_id))]
async fn update_patient(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<PatientPathParams>,
    ValidateJson(request): ValidateJson<UpdatePatient>,
) -> Result<(StatusCode, Json<Patient>)> {
    if request.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("The request changes nothing")
            .with_resource("patient"));
    }

    let patient = auth_state
        .authorize_patient(&mut conn, path_params.patient_id, Permission::ManagePatients)
        .await?;

    let changes = request.into_model();
    let status_changed = changes.status.is_some_and(|status| status != patient.status);
    let actor_id = auth_state.account_id;

    let patient = conn
        .transaction(|conn| {
            Box::pin(async move {
                let updated = conn.update_patient(patient.id, changes).await?;
                conn.create_audit_log(
                    NewAuditLog::new("patient.update", "patient")
                        .agency(updated.agency_id)
                        .actor(actor_id)
                        .target(updated.id)
                        .metadata(serde_json::json!({ "status": updated.status })),
                )
                .await?;
                Ok::<_, Error<'static>>(updated)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        status = %patient.status,
        status_changed,
        "patient updated"
    );

    Ok((StatusCode::OK, Json(patient.into())))
}

fn update_patient_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update patient")
        .description(
            "Updates the patient record. Omitted fields stay unchanged and an empty string \
             clears an optional field.",
        )
        .response::<200, Json<Patient>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Lists the family members linked to a patient.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, patient_id = %path_params.patient_id))]
async fn list_family(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<PatientPathParams>,
) -> Result<(StatusCode, Json<Page<FamilyMember>>)> {
    let patient = auth_state
        .authorize_patient(&mut conn, path_params.patient_id, Permission::ViewPatients)
        .await?;

    let family = conn.list_patient_family(patient.id).await?;
    let family = family.into_iter().map(FamilyMember::from).collect();

    Ok((StatusCode::OK, Json(Page::complete(family))))
}

fn list_family_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List family")
        .description("Lists the family members linked to the patient.")
        .response::<200, Json<Page<FamilyMember>>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for patient records.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/agencies/{agencyId}/patients",
            post_with(create_patient, create_patient_docs).get_with(list_patients, list_patients_docs),
        )
        .api_route(
            "/patients/{patientId}",
            get_with(read_patient, read_patient_docs).patch_with(update_patient, update_patient_docs),
        )
        .api_route("/patients/{patientId}/family", get_with(list_family, list_family_docs))
        .with_path_items(|item| item.tag("Patients"))
}

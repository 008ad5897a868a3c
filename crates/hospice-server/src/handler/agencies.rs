//! Agency profile handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::model::NewAuditLog;
use hospice_postgres::query::{AgencyRepository, AuditLogRepository};

use crate::extract::{AuthProvider, AuthState, Json, Path, Permission, PgPool, ValidateJson};
use crate::handler::request::{AgencyPathParams, UpdateAgency};
use crate::handler::response::{Agency, ErrorResponse};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for agency operations.
const TRACING_TARGET: &str = "hospice_server::handler::agencies";

fn agency_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("Agency not found")
        .with_resource("agency")
}

/// Returns an agency profile.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn read_agency(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
) -> Result<(StatusCode, Json<Agency>)> {
    auth_state
        .authorize_agency(&mut conn, path_params.agency_id, Permission::ViewAgency)
        .await?;

    let agency = conn
        .find_agency_by_id(path_params.agency_id)
        .await?
        .ok_or_else(agency_not_found)?;

    Ok((StatusCode::OK, Json(agency.into())))
}

fn read_agency_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get agency")
        .description("Returns the agency profile. Members of the agency only.")
        .response::<200, Json<Agency>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates an agency profile.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn update_agency(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
    ValidateJson(request): ValidateJson<UpdateAgency>,
) -> Result<(StatusCode, Json<Agency>)> {
    if request.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("The request changes nothing")
            .with_resource("agency"));
    }

    let agency_id = path_params.agency_id;
    auth_state
        .authorize_agency(&mut conn, agency_id, Permission::ManageAgency)
        .await?;

    if conn.find_agency_by_id(agency_id).await?.is_none() {
        return Err(agency_not_found());
    }

    let agency = conn.update_agency(agency_id, request.into_model()).await?;
    conn.create_audit_log(
        NewAuditLog::new("agency.update", "agency")
            .agency(agency_id)
            .actor(auth_state.account_id)
            .target(agency_id),
    )
    .await?;

    tracing::info!(target: TRACING_TARGET, "agency updated");
    Ok((StatusCode::OK, Json(agency.into())))
}

fn update_agency_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update agency")
        .description(
            "Updates the agency profile. Omitted fields stay unchanged and an empty string \
             clears an optional field. Agency admins only.",
        )
        .response::<200, Json<Agency>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for agency profiles.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/agencies/{agencyId}",
            get_with(read_agency, read_agency_docs).patch_with(update_agency, update_agency_docs),
        )
        .with_path_items(|item| item.tag("Agencies"))
}

//! Agency audit log.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::query::AuditLogRepository;
use validator::Validate;

use crate::extract::{AuthProvider, AuthState, Json, Path, Permission, PgPool, Query};
use crate::handler::Result;
use crate::handler::request::{AgencyPathParams, CursorQuery};
use crate::handler::response::{AuditEntry, ErrorResponse, Page};
use crate::service::ServiceState;

/// Lists audit entries of an agency.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn list_audit_logs(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
    Query(query): Query<CursorQuery>,
) -> Result<(StatusCode, Json<Page<AuditEntry>>)> {
    query.validate()?;
    auth_state
        .authorize_agency(&mut conn, path_params.agency_id, Permission::ViewAuditLogs)
        .await?;

    let page = conn
        .list_agency_audit_logs(path_params.agency_id, query.into_pagination()?)
        .await?;

    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, AuditEntry::from))))
}

fn list_audit_logs_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List audit entries")
        .description("Lists administrative actions in the agency, newest first. Agency admins only.")
        .response::<200, Json<Page<AuditEntry>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns routes for the audit log.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/agencies/{agencyId}/audit-logs",
            get_with(list_audit_logs, list_audit_logs_docs),
        )
        .with_path_items(|item| item.tag("Audit Logs"))
}

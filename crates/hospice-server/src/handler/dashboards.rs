//! Agency dashboards.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::query::DashboardRepository;
use hospice_postgres::types::constants::dashboard::REPORT_WINDOW_DAYS;

use crate::extract::{AuthProvider, AuthState, Json, Path, Permission, PgPool};
use crate::handler::Result;
use crate::handler::request::AgencyPathParams;
use crate::handler::response::{Analytics, Compliance, ErrorResponse};
use crate::service::ServiceState;

/// Tracing target for dashboard operations.
const TRACING_TARGET: &str = "hospice_server::handler::dashboards";

/// Returns care-quality indicators of an agency.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn read_compliance(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
) -> Result<(StatusCode, Json<Compliance>)> {
    let agency_id = path_params.agency_id;
    auth_state
        .authorize_agency(&mut conn, agency_id, Permission::ViewDashboards)
        .await?;

    let metrics = conn.compliance_metrics(agency_id, REPORT_WINDOW_DAYS).await?;
    tracing::debug!(
        target: TRACING_TARGET,
        active_patients = metrics.active_patients,
        missed_visits = metrics.missed_visits,
        "compliance computed"
    );

    let compliance = Compliance::new(agency_id, REPORT_WINDOW_DAYS, metrics);
    Ok((StatusCode::OK, Json(compliance)))
}

fn read_compliance_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Compliance dashboard")
        .description(
            "Active patients, patients without a completed visit in the report window, missed \
             visits, overdue supply requests and delivery exceptions. Agency admins only.",
        )
        .response::<200, Json<Compliance>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns the activity breakdown of an agency.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn read_analytics(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
) -> Result<(StatusCode, Json<Analytics>)> {
    let agency_id = path_params.agency_id;
    auth_state
        .authorize_agency(&mut conn, agency_id, Permission::ViewDashboards)
        .await?;

    let metrics = conn.analytics_metrics(agency_id, REPORT_WINDOW_DAYS).await?;
    let analytics = Analytics::new(agency_id, REPORT_WINDOW_DAYS, metrics);

    Ok((StatusCode::OK, Json(analytics)))
}

fn read_analytics_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Analytics dashboard")
        .description(
            "Visits by status and type, deliveries and supply requests by status, and message \
             volume over the report window. Agency admins only.",
        )
        .response::<200, Json<Analytics>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns routes for agency dashboards.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/agencies/{agencyId}/dashboard/compliance",
            get_with(read_compliance, read_compliance_docs),
        )
        .api_route(
            "/agencies/{agencyId}/dashboard/analytics",
            get_with(read_analytics, read_analytics_docs),
        )
        .with_path_items(|item| item.tag("Dashboards"))
}

//! Platform administration handlers for super admins.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hospice_postgres::query::{AgencyRepository, DashboardRepository};
use hospice_postgres::types::InvitationKind;
use hospice_relay::EmailClient;
use validator::Validate;

use super::invitations::{InvitationDraft, deliver_invitation, save_invitation};
use crate::extract::{AuthProvider, AuthState, Json, PgPool, Query, ValidateJson};
use crate::handler::request::{CreateFacilityInvite, CursorQuery, Normalized};
use crate::handler::response::{
    Agency, CreatedInvitation, ErrorResponse, Page, PlatformOverview,
};
use crate::handler::Result;
use crate::service::{PortalSettings, ServiceState};

/// Tracing target for platform administration.
const TRACING_TARGET: &str = "hospice_server::handler::admin";

/// Invites a future agency admin to set up a new facility.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn create_facility_invite(
    PgPool(mut conn): PgPool,
    State(email): State<EmailClient>,
    State(settings): State<PortalSettings>,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateFacilityInvite>,
) -> Result<(StatusCode, Json<CreatedInvitation>)> {
    auth_state.authorize_super_admin()?;

    let draft = InvitationDraft {
        agency_id: None,
        kind: InvitationKind::Facility,
        email: request.email_address.normalized_email(),
        agency_role: None,
        job_role: None,
        patient_id: None,
        relationship: None,
        expires_in_days: request.expires_in_days,
    };

    let invitation = save_invitation(&mut conn, &settings, draft, auth_state.account_id).await?;
    tracing::info!(
        target: TRACING_TARGET,
        invitation_id = %invitation.id,
        "facility invitation saved"
    );

    let response = deliver_invitation(&email, &settings, invitation, None).await;
    Ok((StatusCode::CREATED, Json(response)))
}

fn create_facility_invite_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Invite facility admin")
        .description(
            "Invites someone to create and administer a new agency. Accepting the invitation \
             creates an agency admin account that configures the facility during onboarding.",
        )
        .response::<201, Json<CreatedInvitation>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Lists every agency on the platform.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_agencies(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(query): Query<CursorQuery>,
) -> Result<(StatusCode, Json<Page<Agency>>)> {
    query.validate()?;
    auth_state.authorize_super_admin()?;

    let page = conn.list_agencies(query.into_pagination()?).await?;
    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, Agency::from))))
}

fn list_agencies_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List agencies")
        .description("Lists every agency on the platform, newest first.")
        .response::<200, Json<Page<Agency>>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns platform-wide counts.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn read_overview(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<PlatformOverview>)> {
    auth_state.authorize_super_admin()?;

    let overview = conn.platform_overview().await?;
    Ok((StatusCode::OK, Json(overview.into())))
}

fn read_overview_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Platform overview")
        .description("Counts agencies, accounts per role and active patients.")
        .response::<200, Json<PlatformOverview>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns routes for platform administration.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/admin/facility-invites",
            post_with(create_facility_invite, create_facility_invite_docs),
        )
        .api_route("/admin/agencies", get_with(list_agencies, list_agencies_docs))
        .api_route("/admin/overview", get_with(read_overview, read_overview_docs))
        .with_path_items(|item| item.tag("Admin"))
}

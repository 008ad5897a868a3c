//! First-login onboarding wizard.
//!
//! Each step validates against [`OnboardingProgress`], writes in one
//! transaction and answers with the new status. Re-running a step updates
//! what it wrote before and never moves the recorded step backwards.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hospice_postgres::PgConnection;
use hospice_postgres::model::{Account, NewAgencyUser, NewAuditLog, UpdateAccount};
use hospice_postgres::query::{
    AccountRepository, AgencyRepository, AgencyUserRepository, AuditLogRepository,
};
use hospice_postgres::types::{AgencyRole, InvitationKind, JobRole};
use hospice_relay::EmailClient;

use super::accounts::current_account;
use super::invitations::{InvitationDraft, deliver_invitation, save_invitation};
use crate::extract::{AuthState, Json, PgPool, ValidateJson};
use crate::handler::request::{ConfigureFacility, Normalized, SendStaffInvites, SetPassword};
use crate::handler::response::{ConfiguredFacility, ErrorResponse, OnboardingStatus, StaffInvites};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{
    OnboardingAction, OnboardingProgress, PasswordHasher, PasswordStrength, PortalSettings,
    ServiceState,
};

/// Tracing target for onboarding operations.
const TRACING_TARGET: &str = "hospice_server::handler::onboarding";

/// Highest numeric suffix tried when an agency slug is taken.
const MAX_SLUG_SUFFIX: u32 = 50;

/// Returns `base`, or `base-N` for the first free `N`.
async fn unique_slug(conn: &mut PgConnection, base: String) -> Result<String> {
    if !conn.agency_slug_exists(&base).await? {
        return Ok(base);
    }

    for suffix in 2..=MAX_SLUG_SUFFIX {
        let candidate = format!("{base}-{suffix}");
        if !conn.agency_slug_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Err(ErrorKind::Conflict
        .with_message("An agency with this name already exists")
        .with_resource("agency")
        .with_suggestion("Use a more specific agency name"))
}

fn step_change(account: &Account, action: OnboardingAction) -> Result<UpdateAccount> {
    let step = OnboardingProgress::of(account).apply(action)?;

    Ok(UpdateAccount {
        onboarding_step: Some(step),
        ..Default::default()
    })
}

/// Returns the caller's onboarding status.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn read_onboarding(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<OnboardingStatus>)> {
    let account = current_account(&mut conn, auth_state.account_id).await?;
    let status = OnboardingProgress::of(&account).into();
    Ok((StatusCode::OK, Json(status)))
}

fn read_onboarding_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get onboarding status")
        .description("Returns the recorded step and the actions that would be accepted now.")
        .response::<200, Json<OnboardingStatus>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Sets the caller's password and leaves `needs_password_setup`.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn set_password(
    PgPool(mut conn): PgPool,
    State(password_hasher): State<PasswordHasher>,
    State(password_strength): State<PasswordStrength>,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<SetPassword>,
) -> Result<(StatusCode, Json<OnboardingStatus>)> {
    let account = current_account(&mut conn, auth_state.account_id).await?;

    let mut user_inputs: Vec<&str> = account.email.split('@').collect();
    user_inputs.push(&account.display_name);
    password_strength.validate_password(&request.password, &user_inputs)?;

    let password_hash = password_hasher.hash_password(&request.password)?;
    let changes = UpdateAccount {
        password_hash: Some(Some(password_hash)),
        ..step_change(&account, OnboardingAction::SetPassword)?
    };

    let account = conn.update_account(account.id, changes).await?;

    tracing::info!(
        target: TRACING_TARGET,
        step = %account.onboarding_step,
        "password set"
    );

    Ok((StatusCode::OK, Json(OnboardingProgress::of(&account).into())))
}

fn set_password_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Set password")
        .description(
            "Sets the password. Staff and family accounts finish onboarding here; agency admins \
             continue with the facility step. Weak passwords are rejected.",
        )
        .response::<200, Json<OnboardingStatus>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Creates or updates the admin's agency profile.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn configure_facility(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<ConfigureFacility>,
) -> Result<(StatusCode, Json<ConfiguredFacility>)> {
    let account = current_account(&mut conn, auth_state.account_id).await?;
    let changes = step_change(&account, OnboardingAction::ConfigureFacility)?;

    let (agency, account) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let agency = match conn.find_membership(account.id).await? {
                    Some(member) => {
                        conn.update_agency(member.agency_id, request.into_changes())
                            .await?
                    }
                    None => {
                        let slug = unique_slug(conn, request.slug()).await?;
                        let agency = conn.create_agency(request.into_model(slug, account.id)).await?;
                        conn.add_agency_member(NewAgencyUser {
                            agency_id: agency.id,
                            account_id: account.id,
                            role: AgencyRole::Admin,
                            job_role: JobRole::Coordinator,
                        })
                        .await?;
                        conn.create_audit_log(
                            NewAuditLog::new("agency.create", "agency")
                                .agency(agency.id)
                                .actor(account.id)
                                .target(agency.id),
                        )
                        .await?;
                        agency
                    }
                };

                let account = conn.update_account(account.id, changes).await?;
                Ok::<_, Error<'static>>((agency, account))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        agency_id = %agency.id,
        slug = %agency.slug,
        "facility configured"
    );

    let response = ConfiguredFacility {
        agency: agency.into(),
        status: OnboardingProgress::of(&account).into(),
    };

    Ok((StatusCode::OK, Json(response)))
}

fn configure_facility_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Configure facility")
        .description(
            "Creates the agency on first run and updates its profile afterwards. Agency admins \
             only, after the password step.",
        )
        .response::<200, Json<ConfiguredFacility>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Invites the first staff members of the admin's agency.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn send_staff_invites(
    PgPool(mut conn): PgPool,
    State(email): State<EmailClient>,
    State(settings): State<PortalSettings>,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<SendStaffInvites>,
) -> Result<(StatusCode, Json<StaffInvites>)> {
    let account = current_account(&mut conn, auth_state.account_id).await?;
    let changes = step_change(&account, OnboardingAction::InviteStaff)?;

    let Some(member) = conn.find_membership(account.id).await? else {
        return Err(ErrorKind::Conflict
            .with_message("Configure the facility before inviting staff")
            .with_resource("onboarding"));
    };

    let agency_id = member.agency_id;
    let drafts: Vec<InvitationDraft> = request
        .invites
        .into_iter()
        .map(|invite| InvitationDraft {
            agency_id: Some(agency_id),
            kind: InvitationKind::Team,
            email: invite.email_address.normalized_email(),
            agency_role: Some(invite.agency_role),
            job_role: Some(invite.job_role),
            patient_id: None,
            relationship: None,
            expires_in_days: None,
        })
        .collect();

    let tx_settings = settings.clone();
    let (invitations, account) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let mut invitations = Vec::with_capacity(drafts.len());
                for draft in drafts {
                    invitations.push(save_invitation(conn, &tx_settings, draft, account.id).await?);
                }

                let account = conn.update_account(account.id, changes).await?;
                Ok::<_, Error<'static>>((invitations, account))
            })
        })
        .await?;

    let agency_name = conn.find_agency_by_id(agency_id).await?.map(|agency| agency.name);

    let mut invites = Vec::with_capacity(invitations.len());
    for invitation in invitations {
        invites.push(deliver_invitation(&email, &settings, invitation, agency_name.as_deref()).await);
    }

    tracing::info!(
        target: TRACING_TARGET,
        agency_id = %agency_id,
        count = invites.len(),
        emailed = invites.iter().filter(|invite| invite.email_sent).count(),
        "staff invited"
    );

    let response = StaffInvites {
        invites,
        status: OnboardingProgress::of(&account).into(),
    };

    Ok((StatusCode::OK, Json(response)))
}

fn send_staff_invites_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Invite staff")
        .description(
            "Sends team invitations for the admin's agency. Pending invitations to the same \
             addresses are refreshed. Optional; admins may complete onboarding without it.",
        )
        .response::<200, Json<StaffInvites>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Marks onboarding as completed.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn complete_onboarding(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<OnboardingStatus>)> {
    let account = current_account(&mut conn, auth_state.account_id).await?;
    let changes = step_change(&account, OnboardingAction::Complete)?;
    let account = conn.update_account(account.id, changes).await?;

    tracing::info!(target: TRACING_TARGET, "onboarding completed");
    Ok((StatusCode::OK, Json(OnboardingProgress::of(&account).into())))
}

fn complete_onboarding_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Complete onboarding")
        .description("Finishes onboarding. Agency admins must have configured their facility.")
        .response::<200, Json<OnboardingStatus>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns routes for the onboarding wizard.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/onboarding", get_with(read_onboarding, read_onboarding_docs))
        .api_route("/onboarding/password", post_with(set_password, set_password_docs))
        .api_route(
            "/onboarding/facility",
            put_with(configure_facility, configure_facility_docs),
        )
        .api_route(
            "/onboarding/staff-invites",
            post_with(send_staff_invites, send_staff_invites_docs),
        )
        .api_route(
            "/onboarding/complete",
            post_with(complete_onboarding, complete_onboarding_docs),
        )
        .with_path_items(|item| item.tag("Onboarding"))
}

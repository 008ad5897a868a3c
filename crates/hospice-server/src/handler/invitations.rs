//! Invitation handlers.
//!
//! Agencies invite staff (`team`) and relatives (`family`); super admins
//! invite future agency admins (`facility`, see the admin handlers). A
//! token is accepted at most once and only before it expires. Accepting
//! creates or attaches the account, links it to the agency or patient and
//! signs it in.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hospice_postgres::PgConnection;
use hospice_postgres::model::{
    Account, Invitation as InvitationModel, InvitationState, NewAccount, NewAgencyUser,
    NewAuditLog, NewFamilyMember, NewInvitation,
};
use hospice_postgres::query::{
    AccountRepository, AgencyRepository, AgencyUserRepository, AuditLogRepository,
    FamilyMemberRepository, InvitationRepository, PatientRepository,
};
use hospice_postgres::types::{AgencyRole, InvitationKind, JobRole, OnboardingStep};
use hospice_relay::EmailClient;
use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;
use validator::Validate;

use super::authentication::issue_session;
use crate::extract::{AuthProvider, AuthState, Json, Path, Permission, PgPool, Query, ValidateJson};
use crate::handler::request::{
    AcceptInvitation, AgencyPathParams, CreateInvitation, CursorQuery, InvitationPathParams,
    Normalized, OptionNormalized, TokenPathParams,
};
use crate::handler::response::{
    AcceptedInvitation, CreatedInvitation, ErrorResponse, Invitation, InvitationPreview, Page,
    Session,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{
    CallbackContext, PortalSettings, ServiceState, SessionKeys, callback_location,
    generate_invitation_token, send_invitation_email,
};

/// Tracing target for invitation operations.
const TRACING_TARGET: &str = "hospice_server::handler::invitations";

/// An invitation about to be created or re-sent.
#[derive(Debug, Clone)]
pub(crate) struct InvitationDraft {
    pub agency_id: Option<Uuid>,
    pub kind: InvitationKind,
    pub email: String,
    pub agency_role: Option<AgencyRole>,
    pub job_role: Option<JobRole>,
    pub patient_id: Option<Uuid>,
    pub relationship: Option<String>,
    pub expires_in_days: Option<i64>,
}

impl InvitationDraft {
    fn expires_at(&self, settings: &PortalSettings) -> Result<Timestamp> {
        let hours = self
            .expires_in_days
            .map_or_else(|| settings.invitation_expiry_hours(), |days| days * 24);

        Timestamp::now()
            .checked_add(SignedDuration::from_hours(hours))
            .map_err(|error| {
                ErrorKind::InternalServerError
                    .with_message("Failed to compute the invitation expiry")
                    .with_context(error.to_string())
            })
    }
}

/// Creates the invitation, or refreshes a pending one for the same address.
///
/// A pending family invitation is only refreshed when it names the same
/// patient.
pub(crate) async fn save_invitation(
    conn: &mut PgConnection,
    settings: &PortalSettings,
    draft: InvitationDraft,
    invited_by: Uuid,
) -> Result<InvitationModel> {
    let token = generate_invitation_token();
    let expires_at = draft.expires_at(settings)?;

    let pending = conn
        .find_pending_invitation(&draft.email, draft.agency_id, draft.kind)
        .await?
        .filter(|pending| pending.patient_id == draft.patient_id);

    if let Some(pending) = pending {
        let invitation = conn
            .refresh_invitation(pending.id, token, expires_at.into(), invited_by)
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            invitation_id = %invitation.id,
            kind = %invitation.kind,
            "pending invitation refreshed"
        );

        return Ok(invitation);
    }

    let invitation = conn
        .create_invitation(NewInvitation {
            agency_id: draft.agency_id,
            kind: draft.kind,
            email: draft.email,
            agency_role: draft.agency_role,
            job_role: draft.job_role,
            patient_id: draft.patient_id,
            relationship: draft.relationship,
            token,
            invited_by,
            expires_at: expires_at.into(),
        })
        .await?;

    let mut entry = NewAuditLog::new("invitation.create", "invitation")
        .actor(invited_by)
        .target(invitation.id)
        .metadata(serde_json::json!({ "kind": invitation.kind }));
    if let Some(agency_id) = invitation.agency_id {
        entry = entry.agency(agency_id);
    }
    conn.create_audit_log(entry).await?;

    tracing::info!(
        target: TRACING_TARGET,
        invitation_id = %invitation.id,
        kind = %invitation.kind,
        "invitation created"
    );

    Ok(invitation)
}

/// Emails the invitation link. A failed email never fails the request.
pub(crate) async fn deliver_invitation(
    email: &EmailClient,
    settings: &PortalSettings,
    invitation: InvitationModel,
    agency_name: Option<&str>,
) -> CreatedInvitation {
    let email_sent = send_invitation_email(email, settings, &invitation, agency_name).await;
    let invite_url = settings.invitation_link(&invitation.token);

    CreatedInvitation {
        invitation: invitation.into(),
        email_sent,
        invite_url,
    }
}

/// Maps an invitation that can no longer be accepted to its error.
fn ensure_pending(invitation: &InvitationModel) -> Result<()> {
    match invitation.state() {
        InvitationState::Pending => Ok(()),
        InvitationState::Accepted => Err(ErrorKind::Conflict
            .with_message("This invitation has already been accepted")
            .with_resource("invitation")
            .with_suggestion("Sign in with the account that accepted it")),
        InvitationState::Revoked => Err(ErrorKind::Gone
            .with_message("This invitation has been revoked")
            .with_resource("invitation")),
        InvitationState::Expired => Err(ErrorKind::Gone
            .with_message("This invitation has expired")
            .with_resource("invitation")
            .with_suggestion("Ask the agency to send a new invitation")),
    }
}

fn invitation_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("Invitation not found")
        .with_resource("invitation")
}

/// Finds the account an invitation is addressed to, or creates it.
async fn invited_account(
    conn: &mut PgConnection,
    invitation: &InvitationModel,
    display_name: Option<String>,
) -> Result<(Account, bool)> {
    let is_admin = invitation.agency_role.is_some_and(|role| role.is_admin());
    let role = invitation.kind.account_role(is_admin);

    if let Some(account) = conn.find_account_by_email(&invitation.email).await? {
        if account.is_deleted() {
            return Err(ErrorKind::Forbidden
                .with_message("This account has been deactivated")
                .with_resource("account"));
        }

        if account.role != role {
            return Err(ErrorKind::Conflict
                .with_message(format!(
                    "This email is already registered as '{}'",
                    account.role
                ))
                .with_resource("account"));
        }

        return Ok((account, false));
    }

    let display_name = display_name.unwrap_or_else(|| {
        invitation
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_owned()
    });

    let account = conn
        .create_account(NewAccount {
            email: invitation.email.clone(),
            password_hash: None,
            display_name,
            role,
            onboarding_step: OnboardingStep::NeedsPasswordSetup,
        })
        .await?;

    Ok((account, true))
}

/// Links an account to what the invitation grants.
///
/// Facility invitations grant nothing yet; the agency is created during
/// the facility onboarding step.
async fn grant_invitation(
    conn: &mut PgConnection,
    invitation: &InvitationModel,
    account: &Account,
) -> Result<()> {
    match (invitation.kind, invitation.agency_id, invitation.patient_id) {
        (InvitationKind::Facility, _, _) => {}
        (InvitationKind::Team, Some(agency_id), _) => {
            conn.add_agency_member(NewAgencyUser {
                agency_id,
                account_id: account.id,
                role: invitation.agency_role.unwrap_or_default(),
                job_role: invitation.job_role.unwrap_or(JobRole::Other),
            })
            .await?;
        }
        (InvitationKind::Family, _, Some(patient_id)) => {
            conn.add_family_member(NewFamilyMember {
                patient_id,
                account_id: account.id,
                full_name: account.display_name.clone(),
                relationship: invitation.relationship.clone(),
            })
            .await?;
        }
        _ => {
            return Err(ErrorKind::InternalServerError
                .with_message("Invitation is missing its agency or patient")
                .with_resource("invitation"));
        }
    }

    Ok(())
}

/// Shows who an invitation is for without consuming it.
#[tracing::instrument(skip_all)]
async fn preview_invitation(
    PgPool(mut conn): PgPool,
    Path(path_params): Path<TokenPathParams>,
) -> Result<(StatusCode, Json<InvitationPreview>)> {
    let invitation = conn
        .find_invitation_by_token(&path_params.token)
        .await?
        .ok_or_else(invitation_not_found)?;

    let agency_name = match invitation.agency_id {
        Some(agency_id) => conn.find_agency_by_id(agency_id).await?.map(|a| a.name),
        None => None,
    };

    let preview = InvitationPreview {
        kind: invitation.kind,
        status: invitation.state().into(),
        email_address: invitation.email,
        agency_name,
        expires_at: invitation.expires_at.into(),
    };

    Ok((StatusCode::OK, Json(preview)))
}

fn preview_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Preview invitation")
        .description("Returns the invitation behind a token and its status. Does not consume it.")
        .response::<200, Json<InvitationPreview>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Consumes an invitation and signs the invitee in.
///
/// The lookup, account creation, acceptance and membership run in one
/// transaction. The acceptance itself is a conditional update, so a token
/// raced by two requests is accepted once and the loser gets 409.
#[tracing::instrument(skip_all)]
async fn accept_invitation(
    PgPool(mut conn): PgPool,
    State(session_keys): State<SessionKeys>,
    State(settings): State<PortalSettings>,
    Path(path_params): Path<TokenPathParams>,
    request: Option<ValidateJson<AcceptInvitation>>,
) -> Result<(StatusCode, Json<AcceptedInvitation>)> {
    let ValidateJson(request) = request.unwrap_or_default();
    let token = path_params.token;
    let display_name = request.display_name.trimmed_option();

    let (invitation, account, account_created) = conn
        .transaction(|conn| {
            Box::pin(async move {
                let invitation = conn
                    .find_invitation_by_token(&token)
                    .await?
                    .ok_or_else(invitation_not_found)?;
                ensure_pending(&invitation)?;

                let (account, created) = invited_account(conn, &invitation, display_name).await?;

                let Some(accepted) = conn.accept_invitation(&token, account.id).await? else {
                    let current = conn
                        .find_invitation_by_token(&token)
                        .await?
                        .ok_or_else(invitation_not_found)?;
                    ensure_pending(&current)?;
                    return Err(ErrorKind::Conflict
                        .with_message("This invitation has already been accepted")
                        .with_resource("invitation"));
                };

                grant_invitation(conn, &accepted, &account).await?;

                let mut entry = NewAuditLog::new("invitation.accept", "invitation")
                    .actor(account.id)
                    .target(accepted.id);
                if let Some(agency_id) = accepted.agency_id {
                    entry = entry.agency(agency_id);
                }
                conn.create_audit_log(entry).await?;

                Ok::<_, Error<'static>>((accepted, account, created))
            })
        })
        .await?;

    let (claims, access_token) = issue_session(&mut conn, &session_keys, &settings, &account).await?;

    tracing::info!(
        target: TRACING_TARGET,
        invitation_id = %invitation.id,
        account_id = %account.id,
        account_created,
        "invitation accepted"
    );

    let redirect_to = callback_location(CallbackContext {
        account: Some(&account),
        ..Default::default()
    });

    let response = AcceptedInvitation {
        invitation: invitation.into(),
        account_created,
        session: Session::new(&claims, access_token, redirect_to),
    };

    Ok((StatusCode::OK, Json(response)))
}

fn accept_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Accept invitation")
        .description(
            "Consumes the invitation, creates or attaches the account and returns a session. \
             New accounts must set a password next.",
        )
        .response::<200, Json<AcceptedInvitation>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
        .response::<410, Json<ErrorResponse>>()
}

/// Invites a staff member or a relative of a patient.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn create_invitation(
    PgPool(mut conn): PgPool,
    State(email): State<EmailClient>,
    State(settings): State<PortalSettings>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
    ValidateJson(request): ValidateJson<CreateInvitation>,
) -> Result<(StatusCode, Json<CreatedInvitation>)> {
    let agency_id = path_params.agency_id;
    let patient_id = request.family_patient()?;

    let permission = match request.kind {
        InvitationKind::Family => Permission::InviteFamily,
        _ => Permission::InviteTeam,
    };
    auth_state
        .authorize_agency(&mut conn, agency_id, permission)
        .await?;

    if let Some(patient_id) = patient_id {
        let patient = conn.find_patient_by_id(patient_id).await?;
        if patient.is_none_or(|patient| patient.agency_id != agency_id) {
            return Err(ErrorKind::NotFound
                .with_message("Patient not found in this agency")
                .with_resource("patient"));
        }
    }

    let agency = conn
        .find_agency_by_id(agency_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Agency not found").with_resource("agency"))?;

    let is_team = request.kind == InvitationKind::Team;
    let draft = InvitationDraft {
        agency_id: Some(agency_id),
        kind: request.kind,
        email: request.email_address.normalized_email(),
        agency_role: is_team.then(|| request.agency_role.unwrap_or_default()),
        job_role: is_team.then(|| request.job_role.unwrap_or(JobRole::Other)),
        patient_id,
        relationship: request.relationship.trimmed_option(),
        expires_in_days: request.expires_in_days,
    };

    let invitation = save_invitation(&mut conn, &settings, draft, auth_state.account_id).await?;

    let response = deliver_invitation(&email, &settings, invitation, Some(&agency.name)).await;
    Ok((StatusCode::CREATED, Json(response)))
}

fn create_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create invitation")
        .description(
            "Invites a team member (admins only) or a family member for one patient. A pending \
             invitation for the same address is refreshed instead of duplicated. `emailSent` \
             tells whether the email went out.",
        )
        .response::<201, Json<CreatedInvitation>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists invitations of an agency.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn list_invitations(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
    Query(query): Query<CursorQuery>,
) -> Result<(StatusCode, Json<Page<Invitation>>)> {
    query.validate()?;
    auth_state
        .authorize_agency(&mut conn, path_params.agency_id, Permission::InviteFamily)
        .await?;

    let page = conn
        .list_agency_invitations(path_params.agency_id, query.into_pagination()?)
        .await?;

    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, Invitation::from))))
}

fn list_invitations_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List invitations")
        .description("Lists invitations of the agency, newest first, with their status.")
        .response::<200, Json<Page<Invitation>>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Revokes a pending invitation.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, invitation_id = %path_params.invitation_id))]
async fn revoke_invitation(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<InvitationPathParams>,
) -> Result<StatusCode> {
    let agency_id = path_params.agency_id;
    auth_state
        .authorize_agency(&mut conn, agency_id, Permission::InviteFamily)
        .await?;

    let Some(invitation) = conn
        .revoke_invitation(agency_id, path_params.invitation_id)
        .await?
    else {
        return match conn.find_invitation_by_id(path_params.invitation_id).await? {
            Some(invitation) if invitation.agency_id == Some(agency_id) => {
                ensure_pending(&invitation)?;
                Err(ErrorKind::Conflict.with_resource("invitation"))
            }
            _ => Err(invitation_not_found()),
        };
    };

    conn.create_audit_log(
        NewAuditLog::new("invitation.revoke", "invitation")
            .agency(agency_id)
            .actor(auth_state.account_id)
            .target(invitation.id),
    )
    .await?;

    tracing::info!(target: TRACING_TARGET, invitation_id = %invitation.id, "invitation revoked");
    Ok(StatusCode::NO_CONTENT)
}

fn revoke_invitation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Revoke invitation")
        .description("Revokes a pending invitation. Its token stops working with 410.")
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
        .response::<410, Json<ErrorResponse>>()
}

/// Returns routes that do not require authentication.
pub fn public_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/invitations/{token}",
            get_with(preview_invitation, preview_invitation_docs),
        )
        .api_route(
            "/invitations/{token}/accept",
            post_with(accept_invitation, accept_invitation_docs),
        )
        .with_path_items(|item| item.tag("Invitations"))
}

/// Returns routes that require authentication.
pub fn private_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/agencies/{agencyId}/invitations",
            post_with(create_invitation, create_invitation_docs)
                .get_with(list_invitations, list_invitations_docs),
        )
        .api_route(
            "/agencies/{agencyId}/invitations/{invitationId}",
            delete_with(revoke_invitation, revoke_invitation_docs),
        )
        .with_path_items(|item| item.tag("Invitations"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(expires_in: SignedDuration) -> InvitationModel {
        let now = Timestamp::now();
        InvitationModel {
            id: Uuid::new_v4(),
            agency_id: Some(Uuid::new_v4()),
            kind: InvitationKind::Family,
            email: "daughter@example.org".into(),
            agency_role: None,
            job_role: None,
            patient_id: Some(Uuid::new_v4()),
            relationship: Some("daughter".into()),
            token: "token".into(),
            invited_by: Uuid::new_v4(),
            expires_at: (now + expires_in).into(),
            accepted_at: None,
            accepted_by: None,
            revoked_at: None,
            created_at: now.into(),
        }
    }

    #[test]
    fn pending_invitation_is_accepted() {
        assert!(ensure_pending(&invitation(SignedDuration::from_hours(1))).is_ok());
    }

    #[test]
    fn accepted_invitation_conflicts() {
        let mut accepted = invitation(SignedDuration::from_hours(1));
        accepted.accepted_at = Some(Timestamp::now().into());

        let error = ensure_pending(&accepted).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn expired_and_revoked_invitations_are_gone() {
        let expired = invitation(SignedDuration::from_hours(-1));
        assert_eq!(ensure_pending(&expired).unwrap_err().kind(), ErrorKind::Gone);

        let mut revoked = invitation(SignedDuration::from_hours(1));
        revoked.revoked_at = Some(Timestamp::now().into());
        assert_eq!(ensure_pending(&revoked).unwrap_err().kind(), ErrorKind::Gone);
    }

    #[tokio::test]
    async fn draft_expiry_prefers_request_days() -> anyhow::Result<()> {
        let settings = ServiceState::for_tests()?.settings;
        let draft = InvitationDraft {
            agency_id: None,
            kind: InvitationKind::Facility,
            email: "admin@example.org".into(),
            agency_role: None,
            job_role: None,
            patient_id: None,
            relationship: None,
            expires_in_days: Some(2),
        };

        let expires_at = draft.expires_at(&settings)?;
        let hours = expires_at.duration_since(Timestamp::now()).as_hours();
        assert!((47..=48).contains(&hours));
        Ok(())
    }
}

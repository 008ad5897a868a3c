//! Agency team handlers.
//!
//! Changing a member between `admin` and `staff` also changes the account
//! role and revokes the member's sessions. An agency always keeps at least
//! one admin; the admin rows are locked while a change is checked.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::PgConnection;
use hospice_postgres::model::{NewAuditLog, UpdateAccount};
use hospice_postgres::query::{
    AccountRepository, AccountSessionRepository, AgencyUserRepository, AuditLogRepository,
};
use hospice_postgres::types::{AccountRole, AgencyRole};
use uuid::Uuid;

use crate::extract::{AuthProvider, AuthState, Json, Path, Permission, PgPool, ValidateJson};
use crate::handler::request::{AgencyPathParams, MemberPathParams, UpdateMember};
use crate::handler::response::{ErrorResponse, Member, Page};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for member operations.
const TRACING_TARGET: &str = "hospice_server::handler::members";

fn member_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("Member not found")
        .with_resource("member")
}

/// Account role that goes with an agency role.
fn account_role_for(role: AgencyRole) -> AccountRole {
    match role {
        AgencyRole::Admin => AccountRole::AgencyAdmin,
        AgencyRole::Staff => AccountRole::Staff,
    }
}

/// Whether the agency still has an admin once `account_id` stops being one.
fn keeps_an_admin(admins: &[Uuid], account_id: Uuid) -> bool {
    !admins.contains(&account_id) || admins.len() > 1
}

/// Refuses to leave the agency without an admin.
///
/// Must run inside the transaction that changes the member.
async fn ensure_other_admin(conn: &mut PgConnection, agency_id: Uuid, account_id: Uuid) -> Result<()> {
    let admins = conn
        .lock_agency_members_by_role(agency_id, AgencyRole::Admin)
        .await?;
    if keeps_an_admin(&admins, account_id) {
        return Ok(());
    }

    Err(ErrorKind::Conflict
        .with_message("The agency must keep at least one admin")
        .with_resource("member")
        .with_suggestion("Promote another member to admin first"))
}

/// Lists the members of an agency.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, agency_id = %path_params.agency_id))]
async fn list_members(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<AgencyPathParams>,
) -> Result<(StatusCode, Json<Page<Member>>)> {
    auth_state
        .authorize_agency(&mut conn, path_params.agency_id, Permission::ViewMembers)
        .await?;

    let members = conn.list_agency_members(path_params.agency_id).await?;
    let members = members.into_iter().map(Member::from).collect();

    Ok((StatusCode::OK, Json(Page::complete(members))))
}

fn list_members_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List members")
        .description("Lists the care team of the agency.")
        .response::<200, Json<Page<Member>>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Changes a member's agency role or job role.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, member_id = %path_params.account_id))]
async fn update_member(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MemberPathParams>,
    ValidateJson(request): ValidateJson<UpdateMember>,
) -> Result<(StatusCode, Json<Member>)> {
    if request.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("The request changes nothing")
            .with_resource("member"));
    }

    let MemberPathParams {
        agency_id,
        account_id,
    } = path_params;
    auth_state
        .authorize_agency(&mut conn, agency_id, Permission::ManageMembers)
        .await?;

    let member = conn
        .find_agency_member(agency_id, account_id)
        .await?
        .ok_or_else(member_not_found)?;

    let new_role = request.role.filter(|role| *role != member.role);

    let actor_id = auth_state.account_id;
    let (member, account, revoked) = conn
        .transaction(|conn| {
            Box::pin(async move {
                if new_role == Some(AgencyRole::Staff) {
                    ensure_other_admin(conn, agency_id, account_id).await?;
                }

                let member = conn
                    .update_agency_member(agency_id, account_id, request.into_model())
                    .await?;

                let mut revoked = 0;
                let account = match new_role.map(account_role_for) {
                    // A new account role makes every outstanding token stale.
                    Some(account_role) => {
                        let changes = UpdateAccount {
                            role: Some(account_role),
                            ..Default::default()
                        };
                        revoked = conn.revoke_account_sessions(account_id).await?;
                        conn.update_account(account_id, changes).await?
                    }
                    None => conn
                        .find_account_by_id(account_id)
                        .await?
                        .ok_or_else(member_not_found)?,
                };

                conn.create_audit_log(
                    NewAuditLog::new("member.update", "member")
                        .agency(agency_id)
                        .actor(actor_id)
                        .target(account_id)
                        .metadata(serde_json::json!({
                            "role": member.role,
                            "jobRole": member.job_role,
                        })),
                )
                .await?;

                Ok::<_, Error<'static>>((member, account, revoked))
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        role = %member.role,
        job_role = %member.job_role,
        revoked_sessions = revoked,
        "member updated"
    );

    Ok((StatusCode::OK, Json(Member::from((member, account)))))
}

fn update_member_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update member")
        .description(
            "Changes the member's agency role or job role. A role change revokes the member's \
             sessions. The last admin cannot be demoted. Agency admins only.",
        )
        .response::<200, Json<Member>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Removes a member from an agency and ends their sessions.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, member_id = %path_params.account_id))]
async fn remove_member(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<MemberPathParams>,
) -> Result<StatusCode> {
    let MemberPathParams {
        agency_id,
        account_id,
    } = path_params;
    auth_state
        .authorize_agency(&mut conn, agency_id, Permission::ManageMembers)
        .await?;

    conn.find_agency_member(agency_id, account_id)
        .await?
        .ok_or_else(member_not_found)?;

    let actor_id = auth_state.account_id;
    let revoked = conn
        .transaction(|conn| {
            Box::pin(async move {
                ensure_other_admin(conn, agency_id, account_id).await?;
                conn.remove_agency_member(agency_id, account_id).await?;
                let revoked = conn.revoke_account_sessions(account_id).await?;
                conn.create_audit_log(
                    NewAuditLog::new("member.remove", "member")
                        .agency(agency_id)
                        .actor(actor_id)
                        .target(account_id),
                )
                .await?;
                Ok::<_, Error<'static>>(revoked)
            })
        })
        .await?;

    tracing::info!(target: TRACING_TARGET, revoked_sessions = revoked, "member removed");
    Ok(StatusCode::NO_CONTENT)
}

fn remove_member_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Remove member")
        .description("Removes the member from the agency and revokes their sessions.")
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns routes for agency members.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/agencies/{agencyId}/members",
            get_with(list_members, list_members_docs),
        )
        .api_route(
            "/agencies/{agencyId}/members/{accountId}",
            patch_with(update_member, update_member_docs).delete_with(remove_member, remove_member_docs),
        )
        .with_path_items(|item| item.tag("Members"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agency_roles_map_to_account_roles() {
        assert_eq!(account_role_for(AgencyRole::Admin), AccountRole::AgencyAdmin);
        assert_eq!(account_role_for(AgencyRole::Staff), AccountRole::Staff);
    }

    #[test]
    fn last_admin_cannot_step_down() {
        let admin = Uuid::new_v4();
        assert!(!keeps_an_admin(&[admin], admin));
    }

    #[test]
    fn one_of_several_admins_can_step_down() {
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(keeps_an_admin(&[first, second], first));
    }

    #[test]
    fn removing_staff_leaves_admins_alone() {
        let admin = Uuid::new_v4();
        assert!(keeps_an_admin(&[admin], Uuid::new_v4()));
    }

    #[test]
    fn concurrently_demoted_admin_is_not_counted() {
        // Once a concurrent demotion commits, the locked rows hold one admin.
        let remaining = Uuid::new_v4();
        assert!(!keeps_an_admin(&[remaining], remaining));
    }
}

//! Handlers for the caller's own account.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use hospice_postgres::PgConnection;
use hospice_postgres::model::Account as AccountModel;
use hospice_postgres::query::{AccountRepository, AgencyUserRepository, FamilyMemberRepository};

use crate::extract::{AuthState, Json, PgPool, ValidateJson};
use crate::handler::request::UpdateAccount;
use crate::handler::response::{Account, CurrentAccount, ErrorResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for account operations.
const TRACING_TARGET: &str = "hospice_server::handler::accounts";

/// Loads the account behind a verified token.
pub(crate) async fn current_account(
    conn: &mut PgConnection,
    account_id: uuid::Uuid,
) -> Result<AccountModel> {
    conn.find_account_by_id(account_id)
        .await?
        .filter(|account| !account.is_deleted())
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Account not found")
                .with_resource("account")
        })
}

/// Returns the caller's account with its membership or followed patients.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn read_account(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<CurrentAccount>)> {
    let account = current_account(&mut conn, auth_state.account_id).await?;

    let membership = if account.role.is_agency_member() {
        conn.find_membership(account.id).await?
    } else {
        None
    };

    let patient_ids = if account.role.is_family() {
        conn.list_family_patient_ids(account.id).await?
    } else {
        Vec::new()
    };

    let response = CurrentAccount {
        account: account.into(),
        membership: membership.map(Into::into),
        patient_ids,
    };

    Ok((StatusCode::OK, Json(response)))
}

fn read_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get current account")
        .description(
            "Returns the caller's account. Agency members also get their membership, family \
             members the patients they follow.",
        )
        .response::<200, Json<CurrentAccount>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Updates the caller's display name.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn update_account(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<UpdateAccount>,
) -> Result<(StatusCode, Json<Account>)> {
    let account = conn
        .update_account(auth_state.account_id, request.into_model())
        .await?;

    tracing::info!(target: TRACING_TARGET, "account updated");
    Ok((StatusCode::OK, Json(account.into())))
}

fn update_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update current account")
        .description("Changes the caller's display name.")
        .response::<200, Json<Account>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns routes for the caller's account.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/accounts/me",
            get_with(read_account, read_account_docs).patch_with(update_account, update_account_docs),
        )
        .with_path_items(|item| item.tag("Accounts"))
}

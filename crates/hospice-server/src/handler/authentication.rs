//! Sign-in, sign-out and the post-authentication redirect.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use hospice_postgres::PgConn;
use hospice_postgres::model::{Account, NewAccountSession};
use hospice_postgres::query::{AccountRepository, AccountSessionRepository, InvitationRepository};
use jiff::{SignedDuration, Timestamp};

use crate::extract::{AuthClaims, AuthState, Json, PgPool, Query, ValidateJson};
use crate::handler::request::{CallbackQuery, Normalized, Signin};
use crate::handler::response::{ErrorResponse, Session};
use crate::handler::{ErrorKind, Result};
use crate::service::{
    CallbackContext, PasswordHasher, PortalSettings, ServiceState, SessionKeys, callback_location,
};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "hospice_server::handler::authentication";

/// Stores a new session for `account` and signs its token.
pub(crate) async fn issue_session(
    conn: &mut PgConn,
    session_keys: &SessionKeys,
    settings: &PortalSettings,
    account: &Account,
) -> Result<(AuthClaims, String)> {
    let lifetime = SignedDuration::from_hours(settings.session_lifetime_hours());
    let expires_at = Timestamp::now().checked_add(lifetime).map_err(|error| {
        ErrorKind::InternalServerError
            .with_message("Failed to compute the session expiry")
            .with_context(error.to_string())
    })?;

    let session = conn
        .create_session(NewAccountSession {
            account_id: account.id,
            expires_at: expires_at.into(),
        })
        .await?;

    let claims = AuthClaims::new(account, &session);
    let token = claims.encode(session_keys.encoding_key())?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        session_id = %session.id,
        role = %account.role,
        "session issued"
    );

    Ok((claims, token))
}

/// Where a freshly authenticated account should land.
async fn landing_location(conn: &mut PgConn, account: &Account, next: Option<&str>) -> Result<String> {
    let pending = conn.find_pending_invitation_for_email(&account.email).await?;

    Ok(callback_location(CallbackContext {
        error: None,
        account: Some(account),
        pending_invitation: pending.as_ref().map(|invitation| invitation.token.as_str()),
        next,
    }))
}

/// Verifies an email and password and issues a session token.
///
/// Unknown emails run a dummy verification so both failure paths take the
/// same time.
#[tracing::instrument(skip_all)]
async fn signin(
    PgPool(mut conn): PgPool,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    State(settings): State<PortalSettings>,
    ValidateJson(request): ValidateJson<Signin>,
) -> Result<(StatusCode, Json<Session>)> {
    let email = request.email_address.normalized_email();
    let account = conn
        .find_account_by_email(&email)
        .await?
        .filter(|account| account.is_active());

    let verified = match account.as_ref().and_then(|a| a.password_hash.as_deref()) {
        Some(stored_hash) => password_hasher
            .verify_password(&request.password, stored_hash)
            .is_ok(),
        None => {
            password_hasher.verify_dummy_password(&request.password);
            false
        }
    };

    let Some(account) = account.filter(|_| verified) else {
        tracing::warn!(target: TRACING_TARGET, email = %email, "sign-in failed");
        return Err(ErrorKind::Unauthorized
            .with_message("Invalid email or password")
            .with_resource("authentication"));
    };

    let (claims, token) = issue_session(&mut conn, &session_keys, &settings, &account).await?;
    let redirect_to = landing_location(&mut conn, &account, None).await?;

    Ok((StatusCode::OK, Json(Session::new(&claims, token, redirect_to))))
}

fn signin_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Sign in")
        .description(
            "Verifies the email and password and returns a bearer token together with the \
             page the client should open next.",
        )
        .response::<200, Json<Session>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Revokes the session behind the caller's token.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn signout(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
) -> Result<StatusCode> {
    conn.revoke_session(auth_state.session_id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        session_id = %auth_state.session_id,
        "session revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}

fn signout_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Sign out")
        .description("Revokes the current session. The token stops working immediately.")
        .response::<204, ()>()
        .response::<401, Json<ErrorResponse>>()
}

/// Decides where the client goes after authenticating.
#[tracing::instrument(skip_all, fields(authenticated = auth_state.is_some()))]
async fn callback(
    PgPool(mut conn): PgPool,
    auth_state: Option<AuthState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect> {
    let account = match (&query.error, auth_state) {
        (None, Some(AuthState(claims))) => conn.find_account_by_id(claims.account_id).await?,
        _ => None,
    };

    let location = match &account {
        Some(account) => landing_location(&mut conn, account, query.next.as_deref()).await?,
        None => callback_location(CallbackContext {
            error: query.error.as_deref(),
            ..Default::default()
        }),
    };

    tracing::debug!(target: TRACING_TARGET, location = %location, "callback redirect");
    Ok(Redirect::to(&location))
}

fn callback_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Authentication callback")
        .description(
            "Answers with a 303 redirect. Identity errors go back to sign-in, accounts without \
             a password go to password setup, pending invitations come next, then the landing \
             page of the role. A local `next` path replaces the role landing page.",
        )
        .response_with::<303, (), _>(|res| res.description("Redirect to the next page"))
}

/// Returns routes that do not require authentication.
pub fn public_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/auth/signin", post_with(signin, signin_docs))
        .api_route("/auth/callback", get_with(callback, callback_docs))
        .with_path_items(|item| item.tag("Authentication"))
}

/// Returns routes that require authentication.
pub fn private_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/auth/signout", post_with(signout, signout_docs))
        .with_path_items(|item| item.tag("Authentication"))
}

//! Authentication state verified against the database.
//!
//! A token is only trusted when:
//!
//! 1. its signature and registered claims are valid,
//! 2. the session row it names exists and is neither revoked nor expired,
//! 3. the account exists and is not deleted,
//! 4. the role in the token still equals the account's role.
//!
//! The verified state is cached in the request extensions, so extracting
//! it twice in one request costs one round of queries.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use hospice_postgres::model::{Account, AccountSession};
use hospice_postgres::query::{AccountRepository, AccountSessionRepository};
use hospice_postgres::{PgClient, PgConn};

use super::{AuthClaims, AuthHeader, TRACING_TARGET_AUTHENTICATION};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Claims of a token whose session and account were checked.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthClaims);

impl AuthState {
    /// Wraps claims that already passed [`Self::verify`].
    #[inline]
    pub const fn from_verified_claims(auth_claims: AuthClaims) -> Self {
        Self(auth_claims)
    }

    /// Runs the session, account and role checks for `auth_claims`.
    pub async fn verify(conn: &mut PgConn, auth_claims: AuthClaims) -> Result<Self> {
        let session = Self::verify_session(conn, &auth_claims).await?;
        let account = Self::verify_account(conn, &auth_claims).await?;

        if account.role != auth_claims.role {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %auth_claims.account_id,
                token_role = %auth_claims.role,
                account_role = %account.role,
                "role changed since the token was issued"
            );

            return Err(ErrorKind::Unauthorized
                .with_message("Your account role has changed")
                .with_suggestion("Sign in again to refresh your permissions")
                .with_resource("authentication"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = %auth_claims.account_id,
            session_id = %session.id,
            role = %account.role,
            "authentication verified"
        );

        Ok(Self::from_verified_claims(auth_claims))
    }

    async fn verify_session(conn: &mut PgConn, auth_claims: &AuthClaims) -> Result<AccountSession> {
        let session = conn
            .find_session_by_id(auth_claims.session_id)
            .await?
            .filter(|session| session.account_id == auth_claims.account_id);

        let Some(session) = session else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                session_id = %auth_claims.session_id,
                account_id = %auth_claims.account_id,
                "session not found"
            );

            return Err(ErrorKind::Unauthorized
                .with_message("Authentication session is invalid")
                .with_resource("authentication"));
        };

        if !session.is_valid() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                session_id = %session.id,
                revoked = session.is_revoked(),
                expired = session.is_expired(),
                "session no longer valid"
            );

            return Err(ErrorKind::Unauthorized
                .with_message("Your session has ended")
                .with_suggestion("Sign in again to continue")
                .with_resource("authentication"));
        }

        Ok(session)
    }

    async fn verify_account(conn: &mut PgConn, auth_claims: &AuthClaims) -> Result<Account> {
        let account = conn.find_account_by_id(auth_claims.account_id).await?;

        match account {
            Some(account) if !account.is_deleted() => Ok(account),
            _ => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    account_id = %auth_claims.account_id,
                    "account missing or deleted"
                );

                Err(ErrorKind::Unauthorized
                    .with_message("Account not found")
                    .with_resource("authentication"))
            }
        }
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    PgClient: FromRef<S>,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let AuthHeader(auth_claims) = AuthHeader::from_request_parts(parts, state).await?;
        let pg_client = PgClient::from_ref(state);
        let mut conn = pg_client.get_connection().await?;
        let auth_state = Self::verify(&mut conn, auth_claims).await?;

        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Sync + Send,
    PgClient: FromRef<S>,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(auth_state) => Ok(Some(auth_state)),
            Err(error) if error.kind().status_code().is_server_error() => Err(error),
            Err(_) => Ok(None),
        }
    }
}

impl aide::OperationInput for AuthState {}

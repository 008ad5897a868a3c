//! Bearer token gate for private routes.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::{AuthHeader, TRACING_TARGET_AUTHENTICATION};

/// Rejects requests without a valid bearer token.
///
/// Only the signature and registered claims are checked. The session and
/// account checks run when a handler extracts [`AuthState`], which keeps
/// request validation ahead of any database access.
///
/// [`AuthState`]: crate::extract::AuthState
pub async fn require_authentication(
    AuthHeader(auth_claims): AuthHeader,
    request: Request,
    next: Next,
) -> Response {
    tracing::trace!(
        target: TRACING_TARGET_AUTHENTICATION,
        account_id = %auth_claims.account_id,
        path = %request.uri().path(),
        "bearer token accepted"
    );

    next.run(request).await
}

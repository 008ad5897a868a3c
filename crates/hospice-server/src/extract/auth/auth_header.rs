//! Bearer token extraction.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use super::AuthClaims;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Signature-checked claims from the `Authorization: Bearer` header.
///
/// Only the token itself is verified here. Use [`AuthState`] when the
/// session and account must also be checked against the database.
///
/// [`AuthState`]: crate::extract::AuthState
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader(pub AuthClaims);

impl AuthHeader {
    #[inline]
    pub fn into_auth_claims(self) -> AuthClaims {
        self.0
    }

    fn from_bearer(bearer: &Bearer, session_keys: &SessionKeys) -> Result<Self> {
        AuthClaims::decode(bearer.token(), session_keys.decoding_key()).map(Self)
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let session_keys = SessionKeys::from_ref(state);

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let auth_header = Self::from_bearer(&bearer, &session_keys)?;
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_message("Authentication required")
                        .with_context("Missing Authorization header with Bearer token"),
                    _ => ErrorKind::MalformedAuthToken
                        .with_message("Invalid token format")
                        .with_context("Authorization header must contain a Bearer token"),
                };

                Err(error.with_resource("authentication"))
            }
        }
    }
}

impl aide::OperationInput for AuthHeader {}

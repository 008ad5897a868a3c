use std::borrow::Cow;

use hospice_postgres::model::{Account, AccountSession};
use hospice_postgres::types::AccountRole;
use jiff::{Span, Timestamp};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};

/// JWT claims carried by every session token.
///
/// | Claim | Field        | Description                         |
/// |-------|--------------|-------------------------------------|
/// | `iss` | `issued_by`  | Token issuer                        |
/// | `aud` | `audience`   | Intended audience                   |
/// | `jti` | `session_id` | Row id in `account_sessions`        |
/// | `sub` | `account_id` | Account the token represents        |
/// | `iat` | `issued_at`  | Creation time, seconds since epoch  |
/// | `exp` | `expires_at` | Expiration time, seconds since epoch|
/// | `role`| `role`       | Account role when the token was cut |
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    #[serde(rename = "iss")]
    issued_by: Cow<'static, str>,
    #[serde(rename = "aud")]
    audience: Cow<'static, str>,

    #[serde(rename = "jti")]
    pub session_id: Uuid,
    #[serde(rename = "sub")]
    pub account_id: Uuid,

    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,

    pub role: AccountRole,
}

impl AuthClaims {
    const JWT_AUDIENCE: &str = "hospice:portal";
    const JWT_ISSUER: &str = "hospice";
    const SOON_THRESHOLD_MINUTES: i64 = 5;

    /// Creates claims for a freshly stored session.
    pub fn new(account: &Account, session: &AccountSession) -> Self {
        Self {
            issued_by: Cow::Borrowed(Self::JWT_ISSUER),
            audience: Cow::Borrowed(Self::JWT_AUDIENCE),
            session_id: session.id,
            account_id: account.id,
            issued_at: session.created_at.into(),
            expires_at: session.expires_at.into(),
            role: account.role,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    #[inline]
    #[must_use]
    pub fn expires_soon(&self) -> bool {
        let remaining = self.expires_at.duration_since(Timestamp::now());
        remaining.as_secs() < Self::SOON_THRESHOLD_MINUTES * 60
    }

    /// Returns the remaining lifetime, or zero once expired.
    #[must_use]
    pub fn remaining_lifetime(&self) -> Span {
        let seconds = self.expires_at.as_second() - Timestamp::now().as_second();
        Span::new().seconds(seconds.max(0))
    }

    /// Signs the claims into a compact EdDSA token.
    pub fn encode(&self, encoding_key: &EncodingKey) -> Result<String> {
        let header = Header::new(Algorithm::EdDSA);
        encode(&header, self, encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                account_id = %self.account_id,
                "failed to encode session token"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_context("Unable to create session token")
                .with_resource("authentication")
        })
    }

    /// Verifies the signature and the registered claims of `token`.
    pub fn decode(token: &str, decoding_key: &DecodingKey) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "sub", "exp"]);

        let claims = decode::<Self>(token, decoding_key, &validation)?.claims;

        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                session_id = %claims.session_id,
                account_id = %claims.account_id,
                expired_at = %claims.expires_at,
                "session token expired"
            );

            return Err(ErrorKind::Unauthorized
                .with_message("Authentication session has expired")
                .with_suggestion("Sign in again to continue")
                .with_resource("authentication"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            session_id = %claims.session_id,
            account_id = %claims.account_id,
            role = %claims.role,
            expires_soon = claims.expires_soon(),
            "session token decoded"
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        let error = match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_suggestion("Sign in again to continue"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Authentication token verification failed"),
            JwtErrorKind::InvalidAudience | JwtErrorKind::InvalidIssuer => {
                ErrorKind::Unauthorized
                    .with_message("Authentication token was not issued for this service")
            }
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is incomplete")
                .with_context(format!("missing claim: {claim}")),
            JwtErrorKind::InvalidToken
            | JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Json(_) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is malformed"),
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed")
                .with_context(error.to_string()),
        };

        error.with_resource("authentication")
    }
}

#[cfg(test)]
impl AuthClaims {
    /// Claims for a session nobody stored, valid until `expires_at`.
    pub(crate) fn for_tests(role: AccountRole, expires_at: Timestamp) -> Self {
        Self {
            issued_by: Cow::Borrowed(Self::JWT_ISSUER),
            audience: Cow::Borrowed(Self::JWT_AUDIENCE),
            session_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            issued_at: Timestamp::now(),
            expires_at,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;

    use super::*;
    use crate::service::SessionKeys;

    fn claims(expires_at: Timestamp) -> AuthClaims {
        AuthClaims::for_tests(AccountRole::Staff, expires_at)
    }

    #[test]
    fn token_round_trip() -> anyhow::Result<()> {
        let keys = SessionKeys::for_tests()?;
        let expires_at = Timestamp::now().checked_add(1.hour())?;
        let original = claims(expires_at);

        let token = original.encode(keys.encoding_key())?;
        let decoded = AuthClaims::decode(&token, keys.decoding_key())?;

        assert_eq!(decoded.account_id, original.account_id);
        assert_eq!(decoded.role, AccountRole::Staff);
        assert!(!decoded.expires_soon());
        Ok(())
    }

    #[test]
    fn expired_token_is_unauthorized() -> anyhow::Result<()> {
        let keys = SessionKeys::for_tests()?;
        let expires_at = Timestamp::now().checked_sub(2.hours())?;
        let token = claims(expires_at).encode(keys.encoding_key())?;

        let error = AuthClaims::decode(&token, keys.decoding_key()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn garbage_token_is_malformed() -> anyhow::Result<()> {
        let keys = SessionKeys::for_tests()?;
        let error = AuthClaims::decode("not-a-jwt", keys.decoding_key()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedAuthToken);
        Ok(())
    }
}

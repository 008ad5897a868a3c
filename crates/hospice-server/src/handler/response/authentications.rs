//! Authentication response types.

use hospice_postgres::types::AccountRole;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::AuthClaims;

/// A freshly issued session token.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token for the `Authorization` header.
    pub access_token: String,
    pub session_id: Uuid,
    pub account_id: Uuid,
    pub role: AccountRole,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    /// Where the client should go next.
    pub redirect_to: String,
}

impl Session {
    pub fn new(claims: &AuthClaims, access_token: String, redirect_to: String) -> Self {
        Self {
            access_token,
            session_id: claims.session_id,
            account_id: claims.account_id,
            role: claims.role,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
            redirect_to,
        }
    }
}

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::account_sessions;

/// Server-side record of an issued session token.
///
/// The token's `jti` claim is the session id, so revoking the row
/// invalidates the token before it expires.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = account_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountSession {
    pub id: Uuid,
    pub account_id: Uuid,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Data for creating a session.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = account_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccountSession {
    pub account_id: Uuid,
    pub expires_at: Timestamp,
}

impl AccountSession {
    /// Returns whether the session was explicitly revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Returns whether the session lifetime has passed.
    pub fn is_expired(&self) -> bool {
        jiff::Timestamp::from(self.expires_at) <= jiff::Timestamp::now()
    }

    /// Returns whether the session can authenticate requests.
    pub fn is_valid(&self) -> bool {
        !self.is_revoked() && !self.is_expired()
    }
}

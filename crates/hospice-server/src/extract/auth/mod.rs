//! Authentication and authorization.
//!
//! - [`AuthHeader`]: signature-checked Bearer token
//! - [`AuthClaims`]: JWT claims of a session token
//! - [`AuthState`]: claims verified against the session and account rows
//! - [`AuthProvider`]: agency, patient and platform authorization checks
//! - [`Permission`]: operations checked by [`AuthProvider`]

mod auth_claims;
mod auth_header;
mod auth_provider;
mod auth_state;
mod permission;

use hospice_postgres::types::AccountRole;
use uuid::Uuid;

pub use self::auth_claims::AuthClaims;
pub use self::auth_header::AuthHeader;
pub use self::auth_provider::{AccessScope, AuthProvider, ListFilter};
pub use self::auth_state::AuthState;
pub use self::permission::{AuthResult, Permission};

/// Tracing target for token and session verification.
pub const TRACING_TARGET_AUTHENTICATION: &str = "hospice_server::extract::authentication";

/// Tracing target for permission checks.
pub const TRACING_TARGET_AUTHORIZATION: &str = "hospice_server::extract::authorization";

impl AuthProvider for AuthClaims {
    fn account_id(&self) -> Uuid {
        self.account_id
    }

    fn role(&self) -> AccountRole {
        self.role
    }
}

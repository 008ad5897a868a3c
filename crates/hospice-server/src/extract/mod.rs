//! Request extractors.
//!
//! The extractors here replace their axum counterparts so that every
//! rejection renders as the same JSON error body.
//!
//! - [`AuthState`], [`AuthHeader`]: authentication
//! - [`Json`], [`ValidateJson`], [`Path`], [`Query`]: request data
//! - [`PgPool`]: a pooled database connection
//! - [`WebhookSignature`]: inbound webhook signature headers

pub mod auth;
mod pg_connection;
pub mod reject;
mod webhook_signature;

pub use crate::extract::auth::{
    AccessScope, AuthClaims, AuthHeader, AuthProvider, AuthResult, AuthState, ListFilter,
    Permission, TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION,
};
pub use crate::extract::pg_connection::PgPool;
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
pub use crate::extract::webhook_signature::WebhookSignature;

//! Middleware for `axum::Router`.
//!
//! - [`require_authentication`]: bearer token gate for private routes
//! - [`RouterSecurityExt`]: CORS, security headers, body limit, compression
//! - [`RouterObservabilityExt`]: request ids, tracing spans, request timing
//! - [`RouterRecoveryExt`]: timeouts, panics and middleware errors
//! - [`RouterOpenApiExt`]: OpenAPI document and Scalar UI

mod authentication;
mod observability;
mod recovery;
mod security;
mod specification;

pub use authentication::require_authentication;
pub use observability::{RouteCategory, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, FrameOptions, MAX_BODY_SIZE, ReferrerPolicy, RouterSecurityExt,
    SecurityHeadersConfig,
};
pub use specification::{OpenApiConfig, RouterOpenApiExt};

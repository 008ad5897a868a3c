//! All `aide::`[`ApiRouter`]s with related `axum::`[`Handler`]s.
//!
//! Private routes sit behind [`require_authentication`], which only checks
//! the bearer token. Handlers extract [`AuthState`] to verify the session and
//! the account against the database.
//!
//! [`ApiRouter`]: aide::axum::ApiRouter
//! [`Handler`]: axum::handler::Handler
//! [`AuthState`]: crate::extract::AuthState

mod accounts;
mod admin;
mod agencies;
mod audit_logs;
mod authentication;
mod dashboards;
mod deliveries;
mod error;
mod invitations;
mod members;
mod messages;
mod monitors;
mod notifications;
mod onboarding;
mod patients;
pub(crate) mod request;
pub(crate) mod response;
mod supplies;
mod threads;
mod visits;
mod webhooks;

use aide::axum::ApiRouter;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::require_authentication;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes that need a bearer token.
fn private_routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(authentication::private_routes())
        .merge(invitations::private_routes())
        .merge(accounts::routes())
        .merge(onboarding::routes())
        .merge(admin::routes())
        .merge(agencies::routes())
        .merge(members::routes())
        .merge(patients::routes())
        .merge(messages::routes())
        .merge(visits::routes())
        .merge(supplies::routes())
        .merge(deliveries::routes())
        .merge(threads::routes())
        .merge(notifications::routes())
        .merge(dashboards::routes())
        .merge(audit_logs::routes())
}

/// Returns an [`ApiRouter`] with all routes open to anonymous callers.
fn public_routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(authentication::public_routes())
        .merge(invitations::public_routes())
        .merge(monitors::routes())
        .merge(webhooks::routes())
}

/// Returns an [`ApiRouter`] with all routes.
pub fn routes(state: ServiceState) -> ApiRouter<ServiceState> {
    let require_authentication = from_fn_with_state(state, require_authentication);

    ApiRouter::new()
        .merge(private_routes().route_layer(require_authentication))
        .merge(public_routes())
        .fallback(fallback)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::AUTHORIZATION;
    use axum_test::TestServer;
    use hospice_postgres::types::AccountRole;
    use jiff::{Timestamp, ToSpan};
    use serde_json::json;

    use super::routes;
    use crate::extract::AuthClaims;
    use crate::service::ServiceState;

    /// Returns a [`TestServer`] over state whose database never answers.
    fn create_test_server() -> anyhow::Result<(TestServer, ServiceState)> {
        let state = ServiceState::for_tests()?;
        let app = routes(state.clone()).with_state(state.clone());
        let server = TestServer::new(axum::Router::from(app))?;
        Ok((server, state))
    }

    fn bearer_token(state: &ServiceState, role: AccountRole) -> anyhow::Result<String> {
        let expires_at = Timestamp::now().checked_add(1.hour())?;
        let claims = AuthClaims::for_tests(role, expires_at);
        let token = claims.encode(state.session_keys.encoding_key())?;
        Ok(format!("Bearer {token}"))
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/no-such-route").await;
        response.assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn private_route_without_token_is_unauthorized() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/notifications").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_webhook_event_is_rejected() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server
            .post("/webhooks/events")
            .json(&json!({
                "event": "patient_discharged",
                "data": { "accountId": "0192d3a4-5b6c-7d8e-9f00-112233445566" }
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_patient_id_is_rejected_before_database() -> anyhow::Result<()> {
        let (server, state) = create_test_server()?;
        let token = bearer_token(&state, AccountRole::Staff)?;

        let response = server
            .post("/deliveries")
            .add_header(AUTHORIZATION, token)
            .json(&json!({ "patientId": "not-a-uuid", "itemKey": "gloves" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}

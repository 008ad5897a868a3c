//! Request ids, tracing spans and per-request timing.

use std::time::Instant;

use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::http::header::{self, HeaderName};
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Tracing target for request timing.
const TRACING_TARGET_METRICS: &str = "hospice_server::middleware::metrics";

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Sets and propagates `x-request-id`, opens a span per request and
    /// redacts credentials from logged headers.
    fn with_observability(self) -> Self;

    /// Logs method, route area, status and latency of every request.
    fn with_metrics(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
    }

    fn with_metrics(self) -> Self {
        self.layer(from_fn(track_request))
    }
}

/// Functional area of a route, used to group request logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteCategory {
    Authentication,
    Invitations,
    Accounts,
    Admin,
    Agencies,
    Patients,
    Care,
    Messaging,
    Notifications,
    Webhooks,
    Health,
    Documentation,
    Unknown,
}

impl RouteCategory {
    /// Classifies a path by its first segment.
    pub fn from_path(path: &str) -> Self {
        let first = path.trim_start_matches('/').split('/').next().unwrap_or_default();

        match first {
            "auth" => Self::Authentication,
            "invitations" => Self::Invitations,
            "accounts" | "onboarding" => Self::Accounts,
            "admin" => Self::Admin,
            "agencies" => Self::Agencies,
            "patients" => Self::Patients,
            "visits" | "supplies" | "supply-requests" | "deliveries" => Self::Care,
            "messages" | "threads" => Self::Messaging,
            "notifications" => Self::Notifications,
            "webhooks" => Self::Webhooks,
            "health" => Self::Health,
            "api" => Self::Documentation,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "auth",
            Self::Invitations => "invitations",
            Self::Accounts => "accounts",
            Self::Admin => "admin",
            Self::Agencies => "agencies",
            Self::Patients => "patients",
            Self::Care => "care",
            Self::Messaging => "messaging",
            Self::Notifications => "notifications",
            Self::Webhooks => "webhooks",
            Self::Health => "health",
            Self::Documentation => "documentation",
            Self::Unknown => "unknown",
        }
    }
}

async fn track_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    // Route templates keep ids out of the logs.
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let category = RouteCategory::from_path(&route);

    let response = next.run(request).await;

    tracing::debug!(
        target: TRACING_TARGET_METRICS,
        method = %method,
        route = %route,
        category = category.as_str(),
        status = response.status().as_u16(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[test]
    fn categorizes_by_first_segment() {
        assert_eq!(
            RouteCategory::from_path("/agencies/{agencyId}/members"),
            RouteCategory::Agencies
        );
        assert_eq!(RouteCategory::from_path("/supply-requests"), RouteCategory::Care);
        assert_eq!(RouteCategory::from_path("/threads/{threadId}"), RouteCategory::Messaging);
        assert_eq!(RouteCategory::from_path("/"), RouteCategory::Unknown);
    }

    #[tokio::test]
    async fn request_id_is_returned() -> anyhow::Result<()> {
        let router = Router::new()
            .route("/health", get(|| async { "ok" }))
            .with_metrics()
            .with_observability();
        let server = TestServer::new(router)?;

        let response = server.get("/health").await;
        assert!(response.maybe_header(REQUEST_ID_HEADER).is_some());
        Ok(())
    }
}

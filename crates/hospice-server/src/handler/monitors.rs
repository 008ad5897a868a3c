//! Liveness and database health.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hospice_postgres::PgClient;
use jiff::Timestamp;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::{DatabaseHealth, Health};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "hospice_server::handler::monitors";

/// Pings the database and reports the pool state.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(pg_client): State<PgClient>,
) -> Result<(StatusCode, Json<Health>)> {
    let latency = match pg_client.ping().await {
        Ok(latency) => Some(latency),
        Err(error) => {
            tracing::warn!(target: TRACING_TARGET, error = %error, "database unreachable");
            None
        }
    };

    let database = DatabaseHealth {
        reachable: latency.is_some(),
        latency_ms: latency.map(|latency| u64::try_from(latency.as_millis()).unwrap_or(u64::MAX)),
        pool: pg_client.pool_status().into(),
    };

    let health = Health {
        is_healthy: database.reachable,
        database,
        checked_at: Timestamp::now(),
    };

    let status = if health.is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(target: TRACING_TARGET, healthy = health.is_healthy, "health checked");
    Ok((status, Json(health)))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health")
        .description("Reports whether the database answers and how the connection pool is used.")
        .response::<200, Json<Health>>()
        .response_with::<503, Json<Health>, _>(|res| res.description("Database unreachable"))
}

/// Returns routes for health monitoring.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Health"))
}

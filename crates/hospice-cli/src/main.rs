#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use hospice_server::handler::routes;
use hospice_server::middleware::{
    RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt, RouterSecurityExt,
    SecurityHeadersConfig,
};
use hospice_server::service::{ServiceState, bootstrap_super_admin};

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "hospice_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "hospice_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "hospice_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Parses the configuration, prepares the database and serves the API.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    Cli::init_tracing();

    cli.validate()?;
    cli.log();

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("failed to create service state")?;

    if let Some(account_id) = bootstrap_super_admin(&state, &cli.service.bootstrap)
        .await
        .context("failed to bootstrap the super admin")?
    {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            account_id = %account_id,
            "super admin ready"
        );
    }

    let router = create_router(state, &cli.middleware);
    server::serve(router, cli.server).await?;

    Ok(())
}

/// Builds the application with every middleware layer.
///
/// The last layer added runs first:
/// 1. recovery catches panics and enforces the request timeout;
/// 2. observability assigns request ids and opens spans;
/// 3. security applies CORS, headers, compression and body limits;
/// 4. the routes and the OpenAPI document.
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    let api: Router = routes(state.clone())
        .with_state(state)
        .with_open_api(&middleware.openapi);

    api.with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_metrics()
        .with_observability()
        .with_recovery(&middleware.recovery)
}

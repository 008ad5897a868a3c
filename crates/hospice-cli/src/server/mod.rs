//! HTTP and HTTPS serving with graceful shutdown.
//!
//! Plain HTTP is used unless the `tls` feature is enabled and both a
//! certificate and a key are configured.

mod error;
mod http_server;
#[cfg(feature = "tls")]
mod https_server;
mod lifecycle;
mod shutdown;

use axum::Router;
pub use error::{ServerError, ServerResult};
use http_server::serve_http;
#[cfg(feature = "tls")]
use https_server::serve_https;
use shutdown::shutdown_signal;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;
use crate::config::ServerConfig;

/// Serves the application until a shutdown signal arrives.
///
/// # Errors
///
/// Fails when the configuration is invalid, the address cannot be bound,
/// the TLS material cannot be loaded or the server stops with an I/O error.
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    config
        .validate()
        .map_err(|err| ServerError::invalid_config(&err))?;

    let result = serve_with_protocol(app, config).await;

    if let Err(err) = &result {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error_code = err.error_code(),
            suggestion = err.suggestion(),
            "server failed"
        );
    }

    result
}

async fn serve_with_protocol(app: Router, config: ServerConfig) -> ServerResult<()> {
    #[cfg(feature = "tls")]
    if let (Some(cert_path), Some(key_path)) =
        (config.tls_cert_path.clone(), config.tls_key_path.clone())
    {
        return serve_https(app, config, cert_path, key_path).await;
    }

    serve_http(app, config).await
}

//! HTTPS serving over rustls.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::{ServerError, ServerResult, shutdown_signal};

/// Loads the PEM pair and serves `app` over TLS until shutdown.
pub async fn serve_https(
    app: Router,
    server_config: ServerConfig,
    cert_path: PathBuf,
    key_path: PathBuf,
) -> ServerResult<()> {
    let server_addr = server_config.server_addr();
    let shutdown_timeout = server_config.shutdown_timeout();

    validate_tls_file(&cert_path, "certificate")?;
    validate_tls_file(&key_path, "private key")?;

    let tls_config = RustlsConfig::from_pem_file(&cert_path, &key_path)
        .await
        .map_err(|err| ServerError::TlsCertificate(format!("failed to load TLS material: {err}")))?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        cert_path = %cert_path.display(),
        key_path = %key_path.display(),
        "TLS certificates loaded"
    );

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown_signal(shutdown_timeout).await;
        shutdown_handle.graceful_shutdown(Some(shutdown_timeout));
    });

    serve_with_shutdown(&server_config, || async move {
        axum_server::bind_rustls(server_addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await
    })
    .await
    .map_err(ServerError::Runtime)
}

fn validate_tls_file(path: &Path, kind: &str) -> ServerResult<()> {
    let metadata = std::fs::metadata(path).map_err(|err| {
        ServerError::TlsCertificate(format!("cannot read {kind} {}: {err}", path.display()))
    })?;

    if !metadata.is_file() {
        return Err(ServerError::TlsCertificate(format!(
            "{kind} path is not a file: {}",
            path.display()
        )));
    }

    if metadata.len() == 0 {
        return Err(ServerError::TlsCertificate(format!(
            "{kind} file is empty: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_files() {
        let result = validate_tls_file(Path::new("missing-cert.pem"), "certificate");
        assert!(matches!(result, Err(ServerError::TlsCertificate(msg)) if msg.contains("certificate")));
    }
}

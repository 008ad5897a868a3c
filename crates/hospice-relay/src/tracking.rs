//! Parcel tracking registration.

use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::error::check_response;
use crate::{Error, Result, TRACING_TARGET_TRACKING};

/// Header carrying the tracking API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Shipment registration sent to the tracking service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTracking {
    /// Carrier tracking number.
    pub tracking_number: String,
    /// Carrier slug, e.g. `ups`.
    pub carrier: String,
    /// Delivery id the shipment belongs to.
    pub reference: Uuid,
    /// Free-form metadata echoed back by the service.
    pub metadata: serde_json::Value,
}

impl RegisterTracking {
    /// Creates a registration with empty metadata.
    pub fn new(tracking_number: impl Into<String>, carrier: impl Into<String>, reference: Uuid) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            carrier: carrier.into(),
            reference,
            metadata: serde_json::Value::Object(Default::default()),
        }
    }

    /// Attaches metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

struct TrackingClientInner {
    http: Client,
    endpoint: String,
    api_key: String,
}

/// Client for the third-party parcel tracking service.
///
/// Cheap to clone. A disabled client answers every call with
/// [`Error::Disabled`].
#[derive(Clone)]
pub struct TrackingClient {
    inner: Option<Arc<TrackingClientInner>>,
}

impl TrackingClient {
    /// Creates a client posting to `{base_url}/trackings`.
    pub fn new(http: Client, base_url: Url, api_key: impl Into<String>) -> Self {
        let endpoint = format!("{}/trackings", base_url.as_str().trim_end_matches('/'));
        let inner = TrackingClientInner {
            http,
            endpoint,
            api_key: api_key.into(),
        };

        Self {
            inner: Some(Arc::new(inner)),
        }
    }

    /// Creates a client that never sends anything.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Returns whether the client is configured.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Registers a shipment with the tracking service.
    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET_TRACKING,
        fields(reference = %request.reference, carrier = %request.carrier)
    )]
    pub async fn register(&self, request: &RegisterTracking) -> Result<()> {
        let Some(inner) = &self.inner else {
            return Err(Error::Disabled);
        };

        let response = inner
            .http
            .post(&inner.endpoint)
            .header(API_KEY_HEADER, &inner.api_key)
            .json(request)
            .send()
            .await?;
        let response = check_response(response).await?;

        tracing::debug!(
            target: TRACING_TARGET_TRACKING,
            status = response.status().as_u16(),
            "tracking number registered"
        );

        Ok(())
    }
}

impl fmt::Debug for TrackingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingClient")
            .field("endpoint", &self.inner.as_ref().map(|inner| &inner.endpoint))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    use super::*;
    use crate::RelayConfig;

    async fn serve(router: axum::Router) -> anyhow::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, router).await });
        Ok(format!("http://{addr}/v1/"))
    }

    #[test]
    fn serializes_camel_case() -> anyhow::Result<()> {
        let request = RegisterTracking::new("1Z999", "ups", Uuid::nil());
        let value = serde_json::to_value(&request)?;
        assert_eq!(value["trackingNumber"], "1Z999");
        assert_eq!(value["carrier"], "ups");
        assert_eq!(value["reference"], Uuid::nil().to_string());
        assert!(value["metadata"].is_object());
        Ok(())
    }

    #[tokio::test]
    async fn disabled_client_refuses() {
        let client = TrackingClient::disabled();
        let request = RegisterTracking::new("1Z999", "ups", Uuid::nil());
        let error = client.register(&request).await.unwrap_err();
        assert!(error.is_disabled());
    }

    #[tokio::test]
    async fn posts_registration_with_api_key() -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let router = axum::Router::new().route(
            "/v1/trackings",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let key = headers
                    .get(API_KEY_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned);
                let _ = tx.send((key, body));
                async { StatusCode::CREATED }
            }),
        );
        let base_url = serve(router).await?;

        let client = RelayConfig::default()
            .with_tracking(base_url, "test-key")
            .tracking_client()?;
        let reference = Uuid::new_v4();
        client
            .register(&RegisterTracking::new("9400111899562", "usps", reference))
            .await?;

        let (key, body) = rx.recv().await.ok_or_else(|| anyhow::anyhow!("no request"))?;
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(body["trackingNumber"], "9400111899562");
        assert_eq!(body["reference"], reference.to_string());
        Ok(())
    }

    #[tokio::test]
    async fn maps_rejections_to_api_errors() -> anyhow::Result<()> {
        let router = axum::Router::new().route(
            "/v1/trackings",
            post(|| async { (StatusCode::BAD_REQUEST, "unknown carrier") }),
        );
        let base_url = serve(router).await?;

        let client = RelayConfig::default()
            .with_tracking(base_url, "test-key")
            .tracking_client()?;
        let error = client
            .register(&RegisterTracking::new("X", "other", Uuid::nil()))
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(reqwest::StatusCode::BAD_REQUEST));
        assert!(error.to_string().contains("unknown carrier"));
        Ok(())
    }
}

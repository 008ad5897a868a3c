//! Transactional email through the email edge function.

use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::error::check_response;
use crate::{Error, Result, TRACING_TARGET_EMAIL};

/// Email message accepted by the edge function.
#[derive(Debug, Clone, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl Email {
    /// Creates a message with empty bodies.
    pub fn new(to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: String::new(),
            text: String::new(),
        }
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Sets the plain-text body.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

struct EmailClientInner {
    http: Client,
    function_url: Url,
    service_key: String,
}

/// Client for the email edge function.
#[derive(Clone)]
pub struct EmailClient {
    inner: Option<Arc<EmailClientInner>>,
}

impl EmailClient {
    /// Creates a client posting to `function_url` with a bearer key.
    pub fn new(http: Client, function_url: Url, service_key: impl Into<String>) -> Self {
        let inner = EmailClientInner {
            http,
            function_url,
            service_key: service_key.into(),
        };

        Self {
            inner: Some(Arc::new(inner)),
        }
    }

    /// Creates a client that never sends anything.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Sends one message.
    #[tracing::instrument(skip_all, target = TRACING_TARGET_EMAIL, fields(subject = %email.subject))]
    pub async fn send(&self, email: &Email) -> Result<()> {
        let Some(inner) = &self.inner else {
            return Err(Error::Disabled);
        };

        let response = inner
            .http
            .post(inner.function_url.clone())
            .bearer_auth(&inner.service_key)
            .json(email)
            .send()
            .await?;
        check_response(response).await?;

        tracing::debug!(target: TRACING_TARGET_EMAIL, "email accepted");
        Ok(())
    }
}

impl fmt::Debug for EmailClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailClient")
            .field(
                "function_url",
                &self.inner.as_ref().map(|inner| inner.function_url.as_str()),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::routing::post;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    use super::*;
    use crate::RelayConfig;

    #[tokio::test]
    async fn disabled_client_refuses() {
        let error = EmailClient::disabled()
            .send(&Email::new("a@example.com", "Hi"))
            .await
            .unwrap_err();
        assert!(error.is_disabled());
    }

    #[tokio::test]
    async fn sends_bearer_authenticated_message() -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let router = axum::Router::new().route(
            "/functions/v1/send-email",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned);
                let _ = tx.send((auth, body));
                async { StatusCode::OK }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, router).await });

        let client = RelayConfig::default()
            .with_email(format!("http://{addr}/functions/v1/send-email"), "service-key")
            .email_client()?;
        let email = Email::new("family@example.com", "You're invited")
            .with_html("<p>Join</p>")
            .with_text("Join");
        client.send(&email).await?;

        let (auth, body) = rx.recv().await.ok_or_else(|| anyhow::anyhow!("no request"))?;
        assert_eq!(auth.as_deref(), Some("Bearer service-key"));
        assert_eq!(body["to"], "family@example.com");
        assert_eq!(body["subject"], "You're invited");
        assert_eq!(body["html"], "<p>Join</p>");
        assert_eq!(body["text"], "Join");
        Ok(())
    }
}

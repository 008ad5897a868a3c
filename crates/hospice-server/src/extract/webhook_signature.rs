//! Signature headers of inbound webhooks.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use hospice_relay::{SIGNATURE_HEADER, TIMESTAMP_HEADER, is_within_tolerance, verify_signature};

use crate::handler::{Error, ErrorKind, Result};

/// Raw `X-Hospice-Timestamp` and `X-Hospice-Signature` header values.
///
/// Extraction never fails; [`Self::verify`] decides whether the request is
/// trusted once the body is available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookSignature {
    pub timestamp: Option<String>,
    pub signature: Option<String>,
}

impl WebhookSignature {
    fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_owned())
        };

        Self {
            timestamp: header(TIMESTAMP_HEADER),
            signature: header(SIGNATURE_HEADER),
        }
    }

    /// Checks the signature of `body` against `secret`.
    ///
    /// Missing headers, stale timestamps and mismatching signatures are 401.
    pub fn verify(&self, secret: &str, body: &[u8]) -> Result<()> {
        let (Some(timestamp), Some(signature)) = (&self.timestamp, &self.signature) else {
            return Err(unauthorized("Webhook signature headers are missing"));
        };

        let Ok(timestamp) = timestamp.parse::<i64>() else {
            return Err(unauthorized("Webhook timestamp is not a Unix time"));
        };

        if !is_within_tolerance(timestamp) {
            return Err(unauthorized("Webhook timestamp is too old"));
        }

        if !verify_signature(secret, timestamp, body, signature) {
            return Err(unauthorized("Webhook signature does not match"));
        }

        Ok(())
    }
}

fn unauthorized(message: &'static str) -> Error<'static> {
    ErrorKind::Unauthorized
        .with_message(message)
        .with_resource("webhook")
}

impl<S> FromRequestParts<S> for WebhookSignature
where
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl aide::OperationInput for WebhookSignature {}

#[cfg(test)]
mod tests {
    use hospice_relay::sign_payload;

    use super::*;

    const SECRET: &str = "whsec_portal";

    fn signed(body: &[u8], timestamp: i64) -> anyhow::Result<WebhookSignature> {
        Ok(WebhookSignature {
            timestamp: Some(timestamp.to_string()),
            signature: Some(sign_payload(SECRET, timestamp, body)?),
        })
    }

    #[test]
    fn accepts_fresh_signatures() -> anyhow::Result<()> {
        let body = br#"{"event":"visit_completed"}"#;
        let now = jiff::Timestamp::now().as_second();

        assert!(signed(body, now)?.verify(SECRET, body).is_ok());
        Ok(())
    }

    #[test]
    fn rejects_tampering_and_stale_timestamps() -> anyhow::Result<()> {
        let body = br#"{"event":"visit_completed"}"#;
        let now = jiff::Timestamp::now().as_second();

        let error = signed(body, now)?.verify(SECRET, b"{}").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        let error = signed(body, now - 600)?.verify(SECRET, body).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        let error = WebhookSignature::default().verify(SECRET, body).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn reads_trimmed_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, " 1700000000 ".parse().expect("header value"));
        let signature = WebhookSignature::from_headers(&headers);

        assert_eq!(signature.timestamp.as_deref(), Some("1700000000"));
        assert_eq!(signature.signature, None);
    }
}

//! Relay client configuration.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{EmailClient, Error, Result, TRACING_TARGET_CLIENT, TrackingClient};

/// Default timeout for outbound requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;

/// Settings shared by the tracking and email clients.
///
/// Each integration is enabled by providing both its URL and its key.
/// Leaving both unset disables it.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RelayConfig {
    /// Outbound request timeout in seconds (1-300).
    #[cfg_attr(
        feature = "config",
        arg(long = "relay-timeout-secs", env = "RELAY_TIMEOUT_SECS", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub relay_timeout_secs: u64,

    /// Base URL of the parcel tracking API.
    #[cfg_attr(
        feature = "config",
        arg(long = "tracking-base-url", env = "TRACKING_BASE_URL")
    )]
    #[serde(default)]
    pub tracking_base_url: Option<String>,

    /// API key sent in the `X-Api-Key` header.
    #[cfg_attr(
        feature = "config",
        arg(long = "tracking-api-key", env = "TRACKING_API_KEY")
    )]
    #[serde(default)]
    pub tracking_api_key: Option<String>,

    /// URL of the email edge function.
    #[cfg_attr(
        feature = "config",
        arg(long = "email-function-url", env = "EMAIL_FUNCTION_URL")
    )]
    #[serde(default)]
    pub email_function_url: Option<String>,

    /// Bearer key for the email edge function.
    #[cfg_attr(
        feature = "config",
        arg(long = "email-service-key", env = "EMAIL_SERVICE_KEY")
    )]
    #[serde(default)]
    pub email_service_key: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            relay_timeout_secs: default_timeout_secs(),
            tracking_base_url: None,
            tracking_api_key: None,
            email_function_url: None,
            email_service_key: None,
        }
    }
}

impl RelayConfig {
    /// Returns the request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.relay_timeout_secs)
    }

    /// Enables the tracking integration.
    #[must_use]
    pub fn with_tracking(mut self, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.tracking_base_url = Some(base_url.into());
        self.tracking_api_key = Some(api_key.into());
        self
    }

    /// Enables the email integration.
    #[must_use]
    pub fn with_email(mut self, function_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        self.email_function_url = Some(function_url.into());
        self.email_service_key = Some(service_key.into());
        self
    }

    /// Sets the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.relay_timeout_secs = timeout_secs;
        self
    }

    /// Returns whether tracking registration is configured.
    pub fn is_tracking_enabled(&self) -> bool {
        self.tracking_base_url.is_some()
    }

    /// Returns whether email delivery is configured.
    pub fn is_email_enabled(&self) -> bool {
        self.email_function_url.is_some()
    }

    /// Checks the timeout range and that every integration has both URL and key.
    pub fn validate(&self) -> Result<()> {
        if !TIMEOUT_RANGE.contains(&self.relay_timeout_secs) {
            return Err(Error::Config(format!(
                "relay timeout must be between {} and {} seconds",
                TIMEOUT_RANGE.start(),
                TIMEOUT_RANGE.end()
            )));
        }

        validate_pair(
            "tracking",
            self.tracking_base_url.as_deref(),
            self.tracking_api_key.as_deref(),
        )?;
        validate_pair(
            "email",
            self.email_function_url.as_deref(),
            self.email_service_key.as_deref(),
        )?;

        Ok(())
    }

    /// Builds the tracking client, disabled when no URL is configured.
    pub fn tracking_client(&self) -> Result<TrackingClient> {
        self.validate()?;
        let (Some(base_url), Some(api_key)) = (&self.tracking_base_url, &self.tracking_api_key)
        else {
            tracing::info!(target: TRACING_TARGET_CLIENT, "tracking registration disabled");
            return Ok(TrackingClient::disabled());
        };

        let client = TrackingClient::new(self.http_client()?, parse_url(base_url)?, api_key);
        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            base_url = %base_url,
            "tracking client created"
        );
        Ok(client)
    }

    /// Builds the email client, disabled when no URL is configured.
    pub fn email_client(&self) -> Result<EmailClient> {
        self.validate()?;
        let (Some(function_url), Some(service_key)) =
            (&self.email_function_url, &self.email_service_key)
        else {
            tracing::info!(target: TRACING_TARGET_CLIENT, "email delivery disabled");
            return Ok(EmailClient::disabled());
        };

        let client = EmailClient::new(self.http_client()?, parse_url(function_url)?, service_key);
        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            function_url = %function_url,
            "email client created"
        );
        Ok(client)
    }

    fn http_client(&self) -> Result<reqwest::Client> {
        let user_agent = format!("hospice-relay/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(user_agent)
            .build()?;
        Ok(client)
    }
}

fn validate_pair(name: &str, url: Option<&str>, key: Option<&str>) -> Result<()> {
    match (url, key) {
        (None, None) => Ok(()),
        (Some(url), Some(key)) => {
            if key.trim().is_empty() {
                return Err(Error::Config(format!("{name} key cannot be empty")));
            }
            parse_url(url).map(|_| ())
        }
        (Some(_), None) => Err(Error::Config(format!("{name} url is set without a key"))),
        (None, Some(_)) => Err(Error::Config(format!("{name} key is set without a url"))),
    }
}

fn parse_url(value: &str) -> Result<Url> {
    let url = Url::parse(value).map_err(|err| Error::Config(format!("invalid url {value}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::Config(format!("unsupported url scheme: {scheme}"))),
    }
}

fn mask(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "***")
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("relay_timeout_secs", &self.relay_timeout_secs)
            .field("tracking_base_url", &self.tracking_base_url)
            .field("tracking_api_key", &mask(&self.tracking_api_key))
            .field("email_function_url", &self.email_function_url)
            .field("email_service_key", &mask(&self.email_service_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_everything() {
        let config = RelayConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.is_tracking_enabled());
        assert!(!config.is_email_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_half_configured_integrations() {
        let config = RelayConfig {
            tracking_base_url: Some("https://tracking.example.com".to_owned()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RelayConfig {
            email_service_key: Some("key".to_owned()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_urls_and_timeouts() {
        assert!(
            RelayConfig::default()
                .with_tracking("ftp://tracking.example.com", "key")
                .validate()
                .is_err()
        );
        assert!(
            RelayConfig::default()
                .with_email("not a url", "key")
                .validate()
                .is_err()
        );
        assert!(RelayConfig::default().with_timeout(0).validate().is_err());
        assert!(RelayConfig::default().with_timeout(301).validate().is_err());
    }

    #[test]
    fn debug_masks_keys() {
        let config = RelayConfig::default()
            .with_tracking("https://tracking.example.com", "tracking-secret")
            .with_email("https://edge.example.com/send-email", "email-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("tracking-secret"));
        assert!(!debug.contains("email-secret"));
        assert!(debug.contains("tracking.example.com"));
    }

    #[test]
    fn unconfigured_clients_are_disabled() -> anyhow::Result<()> {
        let config = RelayConfig::default();
        assert!(!config.tracking_client()?.is_enabled());
        assert!(!config.email_client()?.is_enabled());
        Ok(())
    }
}

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client construction and configuration.
pub const TRACING_TARGET_CLIENT: &str = "hospice_relay::client";

/// Tracing target for tracking registration calls.
pub const TRACING_TARGET_TRACKING: &str = "hospice_relay::tracking";

/// Tracing target for outbound email.
pub const TRACING_TARGET_EMAIL: &str = "hospice_relay::email";

mod config;
mod email;
mod error;
mod signing;
mod tracking;

pub use crate::config::{DEFAULT_TIMEOUT_SECS, RelayConfig};
pub use crate::email::{Email, EmailClient};
pub use crate::error::{Error, Result};
pub use crate::signing::{
    SIGNATURE_HEADER, SIGNATURE_TOLERANCE_SECS, TIMESTAMP_HEADER, is_within_tolerance,
    sign_payload, verify_signature,
};
pub use crate::tracking::{RegisterTracking, TrackingClient};

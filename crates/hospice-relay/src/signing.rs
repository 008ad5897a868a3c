//! HMAC-SHA256 payload signing.
//!
//! The signature is the hex digest of `"{timestamp}.{payload}"` keyed with
//! the shared secret. The timestamp travels in [`TIMESTAMP_HEADER`] and the
//! signature in [`SIGNATURE_HEADER`].

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::Sha256;

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the Unix timestamp (seconds) the payload was signed at.
pub const TIMESTAMP_HEADER: &str = "x-hospice-timestamp";

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "x-hospice-signature";

/// Maximum accepted age of a signed payload: 5 minutes.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

fn mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| Error::Config(format!("invalid signing secret: {err}")))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Signs a payload, returning the lowercase hex signature.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String> {
    let mac = mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a hex signature in constant time.
pub fn verify_signature(secret: &str, timestamp: i64, payload: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    mac(secret, timestamp, payload)
        .map(|mac| mac.verify_slice(&expected).is_ok())
        .unwrap_or(false)
}

/// Returns whether `timestamp` is within [`SIGNATURE_TOLERANCE_SECS`] of now.
pub fn is_within_tolerance(timestamp: i64) -> bool {
    let now = Timestamp::now().as_second();
    now.abs_diff(timestamp) <= SIGNATURE_TOLERANCE_SECS.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    #[test]
    fn signature_is_hex_sha256() -> anyhow::Result<()> {
        let signature = sign_payload(SECRET, 1_700_000_000, br#"{"event":"visit_scheduled"}"#)?;
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
        Ok(())
    }

    #[test]
    fn verifies_own_signature() -> anyhow::Result<()> {
        let payload = br#"{"event":"visit_completed"}"#;
        let signature = sign_payload(SECRET, 42, payload)?;
        assert!(verify_signature(SECRET, 42, payload, &signature));
        Ok(())
    }

    #[test]
    fn rejects_tampering() -> anyhow::Result<()> {
        let payload = br#"{"event":"visit_completed"}"#;
        let signature = sign_payload(SECRET, 42, payload)?;
        assert!(!verify_signature(SECRET, 43, payload, &signature));
        assert!(!verify_signature("other", 42, payload, &signature));
        assert!(!verify_signature(SECRET, 42, b"{}", &signature));
        assert!(!verify_signature(SECRET, 42, payload, "not-hex"));
        Ok(())
    }

    #[test]
    fn tolerance_window() {
        let now = Timestamp::now().as_second();
        assert!(is_within_tolerance(now));
        assert!(is_within_tolerance(now - 120));
        assert!(!is_within_tolerance(now - 600));
        assert!(!is_within_tolerance(now + 600));
    }

    #[test]
    fn extreme_timestamps_are_out_of_tolerance() {
        assert!(!is_within_tolerance(i64::MIN));
        assert!(!is_within_tolerance(i64::MAX));
        assert!(!is_within_tolerance(0));
    }
}

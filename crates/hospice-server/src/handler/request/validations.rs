//! Request validation utilities.

use uuid::Uuid;
use validator::ValidationError;

use crate::handler::{ErrorKind, Result};

pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "Value must not be blank"));
    }

    Ok(())
}

/// Rejects IANA zone names that jiff cannot resolve.
pub fn known_time_zone(value: &str) -> Result<(), ValidationError> {
    jiff::tz::TimeZone::get(value)
        .map(|_| ())
        .map_err(|_| validation_error("time_zone", "Unknown IANA time zone"))
}

/// Parses a UUID given as a string, naming `field` when it is malformed.
pub fn parse_uuid_field(field: &'static str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        ErrorKind::BadRequest
            .with_message(format!("Field '{field}' must be a valid UUID"))
            .with_resource(field)
            .with_context(format!("received '{}'", value.trim()))
    })
}

/// Parses an optional UUID string; blank counts as absent.
pub fn parse_optional_uuid_field(field: &'static str, value: Option<&str>) -> Result<Option<Uuid>> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_uuid_field(field, value).map(Some),
        None => Ok(None),
    }
}

/// Trait for normalizing required/non-optional request data
pub trait Normalized {
    /// Trimmed copy of the value.
    fn trimmed(&self) -> String;

    /// Trimmed, lowercased copy, used for email addresses.
    fn normalized_email(&self) -> String;
}

/// Trait for normalizing optional request data
pub trait OptionNormalized {
    /// Trimmed copy; blank strings become `None`.
    fn trimmed_option(&self) -> Option<String>;
}

impl Normalized for String {
    fn trimmed(&self) -> String {
        self.trim().to_owned()
    }

    fn normalized_email(&self) -> String {
        self.trim().to_lowercase()
    }
}

impl OptionNormalized for Option<String> {
    fn trimmed_option(&self) -> Option<String> {
        self.as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_uuid_names_the_field() {
        let error = parse_uuid_field("patientId", "not-a-uuid").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("patientId"));
    }

    #[test]
    fn blank_optional_uuid_is_absent() -> anyhow::Result<()> {
        assert_eq!(parse_optional_uuid_field("supplyRequestId", Some("  "))?, None);
        assert_eq!(parse_optional_uuid_field("supplyRequestId", None)?, None);

        let id = Uuid::new_v4();
        let parsed = parse_optional_uuid_field("supplyRequestId", Some(&id.to_string()))?;
        assert_eq!(parsed, Some(id));
        Ok(())
    }

    #[test]
    fn blank_strings_fail() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank(" x ").is_ok());
    }

    #[test]
    fn normalization() {
        assert_eq!(" Jane@Example.ORG ".to_owned().normalized_email(), "jane@example.org");
        assert_eq!(Some("  ".to_owned()).trimmed_option(), None);
        assert_eq!(Some(" a ".to_owned()).trimmed_option(), Some("a".to_owned()));
    }
}

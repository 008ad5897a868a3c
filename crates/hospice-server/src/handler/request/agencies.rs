//! Agency request types.

use hospice_postgres::model::UpdateAgency as UpdateAgencyModel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Normalized, OptionNormalized, known_time_zone, not_blank};

/// Request payload to update an agency profile.
///
/// Omitted fields are left unchanged; optional fields are cleared with an
/// empty string.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgency {
    /// Agency name (2-120 characters).
    #[validate(length(min = 2, max = 120))]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,

    /// Main phone number.
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    /// Street address.
    #[validate(length(max = 500))]
    pub address: Option<String>,

    /// IANA time zone.
    #[validate(custom(function = "known_time_zone"))]
    pub timezone: Option<String>,

    /// State license number.
    #[validate(length(max = 64))]
    pub license_number: Option<String>,
}

impl UpdateAgency {
    /// Returns whether the request changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.timezone.is_none()
            && self.license_number.is_none()
    }

    pub fn into_model(self) -> UpdateAgencyModel {
        let clearable = |value: Option<String>| value.map(|v| Some(v).trimmed_option());

        UpdateAgencyModel {
            name: self.name.map(|name| name.trimmed()),
            phone: clearable(self.phone),
            address: clearable(self.address),
            timezone: self.timezone.map(|tz| tz.trimmed()),
            license_number: clearable(self.license_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_clears_optional_fields() {
        let request = UpdateAgency {
            name: None,
            phone: Some(String::new()),
            address: Some(" 12 Elm St ".to_owned()),
            timezone: None,
            license_number: None,
        };
        assert!(!request.is_empty());

        let model = request.into_model();
        assert_eq!(model.phone, Some(None));
        assert_eq!(model.address, Some(Some("12 Elm St".to_owned())));
        assert_eq!(model.name, None);
    }
}

//! Account request types.

use hospice_postgres::model::UpdateAccount as UpdateAccountModel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{Normalized, validation_error};

/// Request payload to update the caller's account.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    /// New display name (2-100 characters).
    #[validate(length(min = 2, max = 100))]
    #[validate(custom(function = "validate_display_name_format"))]
    pub display_name: String,
}

impl UpdateAccount {
    pub fn into_model(self) -> UpdateAccountModel {
        UpdateAccountModel {
            display_name: Some(self.display_name.trimmed()),
            ..Default::default()
        }
    }
}

pub(crate) fn validate_display_name_format(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(validation_error("blank", "Display name must not be blank"));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace() || "-'.".contains(c))
    {
        return Err(validation_error(
            "display_name_format",
            "Display name may only contain letters, numbers, spaces, hyphens, apostrophes and periods",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert!(validate_display_name_format("Mary O'Neil").is_ok());
        assert!(validate_display_name_format("Dr. Ana-Luisa").is_ok());
        assert!(validate_display_name_format("<script>").is_err());
        assert!(validate_display_name_format("   ").is_err());
    }
}

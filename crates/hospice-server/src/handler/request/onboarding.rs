//! Onboarding request types.

use hospice_postgres::model::{NewAgency, UpdateAgency};
use hospice_postgres::types::{AgencyRole, JobRole};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Normalized, OptionNormalized, known_time_zone, not_blank};

/// Request payload for the password step.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPassword {
    /// New password; strength is checked after validation.
    #[validate(length(min = 8, max = 256))]
    pub password: String,
}

/// Facility profile written by the facility step.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureFacility {
    /// Agency name (2-120 characters).
    #[validate(length(min = 2, max = 120))]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    /// Main phone number.
    #[validate(length(min = 7, max = 32))]
    pub phone: Option<String>,

    /// Street address.
    #[validate(length(max = 500))]
    pub address: Option<String>,

    /// IANA time zone, e.g. `America/Chicago`.
    #[validate(custom(function = "known_time_zone"))]
    pub timezone: String,

    /// State license number.
    #[validate(length(max = 64))]
    pub license_number: Option<String>,
}

impl ConfigureFacility {
    /// URL-friendly agency identifier derived from the name.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.trim().to_lowercase().chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c);
            } else if !slug.ends_with('-') && !slug.is_empty() {
                slug.push('-');
            }
        }

        let slug = slug.trim_end_matches('-');
        if slug.is_empty() {
            "agency".to_owned()
        } else {
            slug.to_owned()
        }
    }

    pub fn into_model(self, slug: String, created_by: Uuid) -> NewAgency {
        NewAgency {
            name: self.name.trimmed(),
            slug,
            phone: self.phone.trimmed_option(),
            address: self.address.trimmed_option(),
            timezone: self.timezone.trimmed(),
            license_number: self.license_number.trimmed_option(),
            created_by,
        }
    }

    pub fn into_changes(self) -> UpdateAgency {
        UpdateAgency {
            name: Some(self.name.trimmed()),
            phone: Some(self.phone.trimmed_option()),
            address: Some(self.address.trimmed_option()),
            timezone: Some(self.timezone.trimmed()),
            license_number: Some(self.license_number.trimmed_option()),
        }
    }
}

/// One staff member to invite.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffInvite {
    /// Email address of the invitee.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email_address: String,

    /// Role in the agency, `staff` when omitted.
    #[serde(default = "default_agency_role")]
    pub agency_role: AgencyRole,

    /// Job on the care team.
    pub job_role: JobRole,
}

/// Request payload for the staff invite step.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendStaffInvites {
    /// Invitations to send (1-50).
    #[validate(length(min = 1, max = 50))]
    #[validate(nested)]
    pub invites: Vec<StaffInvite>,
}

fn default_agency_role() -> AgencyRole {
    AgencyRole::Staff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(name: &str) -> ConfigureFacility {
        ConfigureFacility {
            name: name.to_owned(),
            phone: None,
            address: None,
            timezone: "UTC".to_owned(),
            license_number: None,
        }
    }

    #[test]
    fn slug_from_name() {
        assert_eq!(facility("Sunrise Hospice & Care").slug(), "sunrise-hospice-care");
        assert_eq!(facility("  St. Mary's  ").slug(), "st-mary-s");
        assert_eq!(facility("!!!").slug(), "agency");
    }

    #[test]
    fn staff_invites_are_bounded() {
        let empty = SendStaffInvites { invites: vec![] };
        assert!(empty.validate().is_err());

        let invalid_email = SendStaffInvites {
            invites: vec![StaffInvite {
                email_address: "nope".to_owned(),
                agency_role: AgencyRole::Staff,
                job_role: JobRole::Nurse,
            }],
        };
        assert!(invalid_email.validate().is_err());
    }
}

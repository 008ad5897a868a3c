//! Invitation request types.

use hospice_postgres::types::{AgencyRole, InvitationKind, JobRole};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validation_error;
use super::accounts::validate_display_name_format;
use crate::handler::{ErrorKind, Result};

/// Request payload to invite a team member or a family member.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitation {
    /// `team` or `family`.
    #[validate(custom(function = "validate_agency_invitation_kind"))]
    pub kind: InvitationKind,

    /// Email address of the invitee.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email_address: String,

    /// Agency role for team invitations, `staff` when omitted.
    pub agency_role: Option<AgencyRole>,

    /// Job role for team invitations, `other` when omitted.
    pub job_role: Option<JobRole>,

    /// Patient the family member follows. Required for family invitations.
    pub patient_id: Option<Uuid>,

    /// Relationship of the family member to the patient.
    #[validate(length(min = 1, max = 64))]
    pub relationship: Option<String>,

    /// Days until the invitation expires (1-30).
    #[validate(range(min = 1, max = 30))]
    pub expires_in_days: Option<i64>,
}

impl CreateInvitation {
    /// Returns the patient of a family invitation, or why the combination
    /// of fields is invalid.
    pub fn family_patient(&self) -> Result<Option<Uuid>> {
        match (self.kind, self.patient_id) {
            (InvitationKind::Family, Some(patient_id)) => Ok(Some(patient_id)),
            (InvitationKind::Family, None) => Err(ErrorKind::BadRequest
                .with_message("Family invitations require a patientId")
                .with_resource("patientId")),
            (_, Some(_)) => Err(ErrorKind::BadRequest
                .with_message("Only family invitations name a patient")
                .with_resource("patientId")),
            (_, None) => Ok(None),
        }
    }
}

/// Request payload for a super admin inviting a new agency admin.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityInvite {
    /// Email address of the future agency admin.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email_address: String,

    /// Days until the invitation expires (1-30).
    #[validate(range(min = 1, max = 30))]
    pub expires_in_days: Option<i64>,
}

/// Request payload for accepting an invitation.
///
/// The display name is only used when the accept creates a new account.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitation {
    /// Display name for a new account (2-100 characters).
    #[validate(length(min = 2, max = 100))]
    #[validate(custom(function = "validate_display_name_format"))]
    pub display_name: Option<String>,
}

fn validate_agency_invitation_kind(kind: &InvitationKind) -> Result<(), ValidationError> {
    match kind {
        InvitationKind::Team | InvitationKind::Family => Ok(()),
        InvitationKind::Facility => Err(validation_error(
            "invitation_kind",
            "Facility invitations are sent from the platform admin console",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(kind: InvitationKind, patient_id: Option<Uuid>) -> CreateInvitation {
        CreateInvitation {
            kind,
            email_address: "nurse@example.org".to_owned(),
            agency_role: None,
            job_role: None,
            patient_id,
            relationship: None,
            expires_in_days: None,
        }
    }

    #[test]
    fn facility_kind_is_rejected() {
        assert!(invitation(InvitationKind::Facility, None).validate().is_err());
        assert!(invitation(InvitationKind::Team, None).validate().is_ok());
    }

    #[test]
    fn family_invitations_need_a_patient() -> anyhow::Result<()> {
        let patient_id = Uuid::new_v4();
        assert_eq!(
            invitation(InvitationKind::Family, Some(patient_id)).family_patient()?,
            Some(patient_id)
        );

        let error = invitation(InvitationKind::Family, None).family_patient().unwrap_err();
        assert_eq!(error.resource(), Some("patientId"));

        let error = invitation(InvitationKind::Team, Some(patient_id))
            .family_patient()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        Ok(())
    }
}

//! Invitation response types.

use hospice_postgres::model::{self, InvitationState};
use hospice_postgres::types::{AgencyRole, InvitationKind, JobRole};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Session;

/// Lifecycle status of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Revoked,
    Expired,
}

impl From<InvitationState> for InvitationStatus {
    fn from(state: InvitationState) -> Self {
        match state {
            InvitationState::Pending => Self::Pending,
            InvitationState::Accepted => Self::Accepted,
            InvitationState::Revoked => Self::Revoked,
            InvitationState::Expired => Self::Expired,
        }
    }
}

/// Represents an invitation as seen by the agency.
///
/// The token itself is never returned; it only travels in the email link.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub invitation_id: Uuid,
    pub agency_id: Option<Uuid>,
    pub kind: InvitationKind,
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_role: Option<AgencyRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_role: Option<JobRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    pub status: InvitationStatus,
    pub invited_by: Uuid,
    pub expires_at: Timestamp,
    pub accepted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<model::Invitation> for Invitation {
    fn from(invitation: model::Invitation) -> Self {
        Self {
            status: invitation.state().into(),
            invitation_id: invitation.id,
            agency_id: invitation.agency_id,
            kind: invitation.kind,
            email_address: invitation.email,
            agency_role: invitation.agency_role,
            job_role: invitation.job_role,
            patient_id: invitation.patient_id,
            relationship: invitation.relationship,
            invited_by: invitation.invited_by,
            expires_at: invitation.expires_at.into(),
            accepted_at: invitation.accepted_at.map(Into::into),
            created_at: invitation.created_at.into(),
        }
    }
}

/// A newly created or refreshed invitation.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvitation {
    pub invitation: Invitation,
    /// Whether the invitation email was handed to the mail provider.
    pub email_sent: bool,
    /// Link to share by other means when the email could not be sent.
    pub invite_url: String,
}

/// Public view of an invitation, looked up by its token.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationPreview {
    pub kind: InvitationKind,
    pub email_address: String,
    pub agency_name: Option<String>,
    pub status: InvitationStatus,
    pub expires_at: Timestamp,
}

/// Outcome of accepting an invitation.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedInvitation {
    pub invitation: Invitation,
    /// True when the account did not exist before.
    pub account_created: bool,
    pub session: Session,
}

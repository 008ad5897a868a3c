//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for agency-level operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyPathParams {
    /// Unique identifier of the agency.
    pub agency_id: Uuid,
}

/// Path parameters for agency member operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberPathParams {
    /// Unique identifier of the agency.
    pub agency_id: Uuid,
    /// Unique identifier of the member account.
    pub account_id: Uuid,
}

/// Path parameters for agency invitation operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationPathParams {
    /// Unique identifier of the agency.
    pub agency_id: Uuid,
    /// Unique identifier of the invitation.
    pub invitation_id: Uuid,
}

/// Path parameters for previewing or accepting an invitation.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPathParams {
    /// Invitation token from the emailed link.
    pub token: String,
}

/// Path parameters for patient operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientPathParams {
    /// Unique identifier of the patient.
    pub patient_id: Uuid,
}

/// Path parameters for direct message operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessagePathParams {
    /// Unique identifier of the message.
    pub message_id: Uuid,
}

/// Path parameters for visit operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitPathParams {
    /// Unique identifier of the visit.
    pub visit_id: Uuid,
}

/// Path parameters for supply request operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRequestPathParams {
    /// Unique identifier of the supply request.
    pub request_id: Uuid,
}

/// Path parameters for delivery operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPathParams {
    /// Unique identifier of the delivery.
    pub delivery_id: Uuid,
}

/// Path parameters for message thread operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPathParams {
    /// Unique identifier of the thread.
    pub thread_id: Uuid,
}

/// Path parameters for notification operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPathParams {
    /// Unique identifier of the notification.
    pub notification_id: Uuid,
}

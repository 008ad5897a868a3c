//! Direct message request types.

use hospice_postgres::model::NewMessage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

/// Request payload to send a patient-scoped direct message.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    /// Account receiving the message: a family member of the patient when
    /// staff send, an agency member when family send.
    pub recipient_id: Uuid,

    /// Message text (1-4000 characters).
    #[validate(length(min = 1, max = 4000))]
    #[validate(custom(function = "not_blank"))]
    pub body: String,
}

impl SendMessage {
    pub fn into_model(self, agency_id: Uuid, patient_id: Uuid, sender_id: Uuid) -> NewMessage {
        NewMessage {
            agency_id,
            patient_id,
            sender_id,
            recipient_id: self.recipient_id,
            body: self.body.trim().to_owned(),
        }
    }
}

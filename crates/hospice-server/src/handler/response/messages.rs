//! Direct message response types.

use hospice_postgres::model;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A direct message about a patient.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: Uuid,
    pub patient_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<model::Message> for Message {
    fn from(message: model::Message) -> Self {
        Self {
            message_id: message.id,
            patient_id: message.patient_id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            body: message.body,
            is_read: message.is_read,
            read_at: message.read_at.map(Into::into),
            created_at: message.created_at.into(),
        }
    }
}

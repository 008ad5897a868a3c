//! Message thread response types.

use hospice_postgres::model;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A group conversation.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub thread_id: Uuid,
    pub agency_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub subject: String,
    pub created_by: Uuid,
    /// Messages the caller has not read yet.
    pub unread: i64,
    pub created_at: Timestamp,
    /// Time of the latest message.
    pub updated_at: Timestamp,
}

impl Thread {
    pub fn new(thread: model::MessageThread, unread: i64) -> Self {
        Self {
            thread_id: thread.id,
            agency_id: thread.agency_id,
            patient_id: thread.patient_id,
            subject: thread.subject,
            created_by: thread.created_by,
            unread,
            created_at: thread.created_at.into(),
            updated_at: thread.updated_at.into(),
        }
    }
}

impl From<model::ThreadSummary> for Thread {
    fn from(summary: model::ThreadSummary) -> Self {
        Self::new(summary.thread, summary.unread)
    }
}

/// A thread with its participants.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDetails {
    #[serde(flatten)]
    pub thread: Thread,
    pub participant_ids: Vec<Uuid>,
}

/// One message posted to a thread.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMessage {
    pub message_id: Uuid,
    pub thread_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: Timestamp,
}

impl From<model::ThreadMessage> for ThreadMessage {
    fn from(message: model::ThreadMessage) -> Self {
        Self {
            message_id: message.id,
            thread_id: message.thread_id,
            sender_id: message.sender_id,
            body: message.body,
            created_at: message.created_at.into(),
        }
    }
}

/// Read marker of the caller in a thread.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadReadMarker {
    pub thread_id: Uuid,
    pub last_read_at: Option<Timestamp>,
}

impl From<model::ThreadParticipant> for ThreadReadMarker {
    fn from(participant: model::ThreadParticipant) -> Self {
        Self {
            thread_id: participant.thread_id,
            last_read_at: participant.last_read_at.map(Into::into),
        }
    }
}

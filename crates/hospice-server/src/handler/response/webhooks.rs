//! Webhook response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement of an accepted webhook event.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAccepted {
    /// Notification written for the event.
    pub notification_id: Uuid,
}

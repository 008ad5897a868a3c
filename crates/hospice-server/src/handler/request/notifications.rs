//! Notification request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Filters for the notification inbox.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListFilter {
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

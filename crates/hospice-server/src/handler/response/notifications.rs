//! Notification response types.

use hospice_postgres::model;
use hospice_postgres::types::NotificationEvent;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An in-app notification.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_id: Uuid,
    pub agency_id: Option<Uuid>,
    pub event: NotificationEvent,
    pub title: String,
    pub body: Option<String>,
    /// Event-specific identifiers.
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl From<model::Notification> for Notification {
    fn from(notification: model::Notification) -> Self {
        Self {
            notification_id: notification.id,
            agency_id: notification.agency_id,
            event: notification.event,
            title: notification.title,
            body: notification.body,
            payload: notification.payload,
            is_read: notification.is_read,
            created_at: notification.created_at.into(),
        }
    }
}

/// Number of notifications marked as read.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkedRead {
    pub updated: usize,
}

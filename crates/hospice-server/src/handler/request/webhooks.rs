//! Inbound event webhook payload.

use std::str::FromStr;

use hospice_postgres::model::NewNotification;
use hospice_postgres::types::NotificationEvent;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{OptionNormalized, parse_optional_uuid_field, parse_uuid_field};
use crate::handler::{ErrorKind, Result};

/// Body of `POST /webhooks/events`.
///
/// Fields are loosely typed so that every problem becomes a 400 that names
/// the offending field.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// One of `visit_scheduled`, `visit_completed`, `message_received`,
    /// `delivery_updated`, `supply_fulfilled`.
    pub event: Option<String>,

    pub data: Option<WebhookEventData>,
}

/// Event data.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventData {
    /// Recipient account (UUID).
    pub account_id: Option<String>,
    /// Agency the event belongs to (UUID).
    pub agency_id: Option<String>,
    /// Notification title; derived from the event when omitted.
    pub title: Option<String>,
    /// Notification body.
    pub body: Option<String>,
}

impl WebhookEvent {
    /// Parses a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|error| {
            ErrorKind::BadRequest
                .with_message("Webhook body must be a JSON object")
                .with_context(error.to_string())
                .with_resource("webhook")
        })
    }

    /// Checks the event and recipient and builds the notification row.
    pub fn into_notification(self) -> Result<NewNotification> {
        let Some(name) = self.event.as_deref().map(str::trim).filter(|e| !e.is_empty()) else {
            return Err(ErrorKind::BadRequest
                .with_message("Field 'event' is required")
                .with_resource("event"));
        };

        let event = NotificationEvent::from_str(name).map_err(|_| {
            ErrorKind::BadRequest
                .with_message(format!("Unknown event type '{name}'"))
                .with_resource("event")
                .with_suggestion(
                    "Use one of: visit_scheduled, visit_completed, message_received, \
                     delivery_updated, supply_fulfilled",
                )
        })?;

        let data = self.data.unwrap_or_default();
        let Some(account_id) = data.account_id.as_deref() else {
            return Err(ErrorKind::BadRequest
                .with_message("Field 'data.accountId' is required")
                .with_resource("accountId"));
        };

        let account_id: Uuid = parse_uuid_field("accountId", account_id)?;
        let agency_id = parse_optional_uuid_field("agencyId", data.agency_id.as_deref())?;
        let title = data
            .title
            .trimmed_option()
            .unwrap_or_else(|| event.default_title().to_owned());

        Ok(NewNotification {
            agency_id,
            account_id,
            event,
            title,
            body: data.body.trimmed_option(),
            payload: serde_json::json!({ "source": "webhook" }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: serde_json::Value) -> Result<NewNotification> {
        WebhookEvent::from_slice(body.to_string().as_bytes())?.into_notification()
    }

    #[test]
    fn unknown_event_is_rejected() {
        let error = parse(serde_json::json!({
            "event": "patient_discharged",
            "data": { "accountId": Uuid::new_v4() }
        }))
        .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("event"));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let error = parse(serde_json::json!({ "data": {} })).unwrap_err();
        assert_eq!(error.resource(), Some("event"));

        let error = parse(serde_json::json!({ "event": "visit_completed" })).unwrap_err();
        assert_eq!(error.resource(), Some("accountId"));

        let error = parse(serde_json::json!({
            "event": "visit_completed",
            "data": { "accountId": "abc" }
        }))
        .unwrap_err();
        assert_eq!(error.resource(), Some("accountId"));
    }

    #[test]
    fn title_defaults_from_event() -> anyhow::Result<()> {
        let account_id = Uuid::new_v4();
        let notification = parse(serde_json::json!({
            "event": "delivery_updated",
            "data": { "accountId": account_id, "body": "Out for delivery" }
        }))?;

        assert_eq!(notification.account_id, account_id);
        assert_eq!(notification.event, NotificationEvent::DeliveryUpdated);
        assert_eq!(notification.title, NotificationEvent::DeliveryUpdated.default_title());
        assert_eq!(notification.body.as_deref(), Some("Out for delivery"));
        Ok(())
    }

    #[test]
    fn non_json_body_is_rejected() {
        let error = WebhookEvent::from_slice(b"event=visit_completed").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }
}

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::notifications;
use crate::types::NotificationEvent;

/// In-app notification addressed to one account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: Uuid,
    pub agency_id: Option<Uuid>,
    pub account_id: Uuid,
    pub event: NotificationEvent,
    pub title: String,
    pub body: Option<String>,
    /// Event-specific identifiers, always a JSON object.
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// Data for creating a notification.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewNotification {
    pub agency_id: Option<Uuid>,
    pub account_id: Uuid,
    pub event: NotificationEvent,
    pub title: String,
    pub body: Option<String>,
    pub payload: serde_json::Value,
}

impl NewNotification {
    /// Creates a notification with the event's default title and an empty payload.
    pub fn new(account_id: Uuid, event: NotificationEvent) -> Self {
        Self {
            agency_id: None,
            account_id,
            event,
            title: event.default_title().to_owned(),
            body: None,
            payload: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_agency(mut self, agency_id: Uuid) -> Self {
        self.agency_id = Some(agency_id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        if payload.is_object() {
            self.payload = payload;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_event() {
        let notification = NewNotification::new(Uuid::new_v4(), NotificationEvent::DeliveryUpdated);
        assert_eq!(notification.title, "A delivery was updated");
        assert!(notification.payload.is_object());
    }

    #[test]
    fn non_object_payloads_are_ignored() {
        let notification = NewNotification::new(Uuid::new_v4(), NotificationEvent::VisitScheduled)
            .with_payload(serde_json::json!([1, 2, 3]));
        assert!(notification.payload.is_object());
    }
}

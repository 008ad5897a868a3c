use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Event that produced a notification.
///
/// Corresponds to the `NOTIFICATION_EVENT` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::NotificationEvent"]
#[strum(serialize_all = "snake_case")]
pub enum NotificationEvent {
    #[db_rename = "visit_scheduled"]
    #[serde(rename = "visit_scheduled")]
    VisitScheduled,

    #[db_rename = "visit_completed"]
    #[serde(rename = "visit_completed")]
    VisitCompleted,

    #[db_rename = "message_received"]
    #[serde(rename = "message_received")]
    MessageReceived,

    #[db_rename = "delivery_updated"]
    #[serde(rename = "delivery_updated")]
    DeliveryUpdated,

    #[db_rename = "supply_fulfilled"]
    #[serde(rename = "supply_fulfilled")]
    SupplyFulfilled,
}

impl NotificationEvent {
    /// Returns the title used when the producer does not supply one.
    pub const fn default_title(self) -> &'static str {
        match self {
            Self::VisitScheduled => "A visit was scheduled",
            Self::VisitCompleted => "A visit was completed",
            Self::MessageReceived => "You have a new message",
            Self::DeliveryUpdated => "A delivery was updated",
            Self::SupplyFulfilled => "A supply request was fulfilled",
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_wire_names() {
        for event in NotificationEvent::iter() {
            let parsed: NotificationEvent = event.to_string().parse().expect("round trip");
            assert_eq!(parsed, event);
            assert!(!event.default_title().is_empty());
        }
        assert!("visit_rescheduled".parse::<NotificationEvent>().is_err());
    }
}

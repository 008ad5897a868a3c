use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Shipment status of a delivery.
///
/// Corresponds to the `DELIVERY_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::DeliveryStatus"]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryStatus {
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,

    #[db_rename = "in_transit"]
    #[serde(rename = "in_transit")]
    InTransit,

    #[db_rename = "out_for_delivery"]
    #[serde(rename = "out_for_delivery")]
    OutForDelivery,

    #[db_rename = "delivered"]
    #[serde(rename = "delivered")]
    Delivered,

    /// The carrier reported a problem with the shipment.
    #[db_rename = "exception"]
    #[serde(rename = "exception")]
    Exception,
}

impl DeliveryStatus {
    /// Returns whether the shipment has arrived.
    #[inline]
    pub const fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::deliveries;
use crate::types::{Carrier, DeliveryStatus};

/// Shipment of a catalog item to a patient's home.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Delivery {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    pub supply_request_id: Option<Uuid>,
    pub item_key: String,
    pub carrier: Option<Carrier>,
    pub tracking_number: Option<String>,
    pub status: DeliveryStatus,
    /// Whether the external tracking service accepted the shipment.
    pub tracking_registered: bool,
    pub estimated_delivery_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating a delivery.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDelivery {
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    pub supply_request_id: Option<Uuid>,
    pub item_key: String,
    pub carrier: Option<Carrier>,
    pub tracking_number: Option<String>,
    pub status: DeliveryStatus,
    pub estimated_delivery_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub created_by: Uuid,
}

/// Partial delivery update.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateDelivery {
    pub carrier: Option<Option<Carrier>>,
    pub tracking_number: Option<Option<String>>,
    pub status: Option<DeliveryStatus>,
    pub tracking_registered: Option<bool>,
    pub estimated_delivery_at: Option<Option<Timestamp>>,
    pub delivered_at: Option<Option<Timestamp>>,
}

impl Delivery {
    /// Returns the carrier and tracking number when both are known.
    pub fn tracking(&self) -> Option<(Carrier, &str)> {
        Some((self.carrier?, self.tracking_number.as_deref()?))
    }
}

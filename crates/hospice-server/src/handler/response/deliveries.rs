//! Delivery response types.

use hospice_postgres::model;
use hospice_postgres::types::{Carrier, DeliveryStatus};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shipment of supplies to a patient.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub delivery_id: Uuid,
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    pub supply_request_id: Option<Uuid>,
    pub item_key: String,
    pub carrier: Option<Carrier>,
    pub tracking_number: Option<String>,
    pub status: DeliveryStatus,
    /// Whether the tracking service accepted the shipment.
    pub tracking_registered: bool,
    pub estimated_delivery_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<model::Delivery> for Delivery {
    fn from(delivery: model::Delivery) -> Self {
        Self {
            delivery_id: delivery.id,
            agency_id: delivery.agency_id,
            patient_id: delivery.patient_id,
            supply_request_id: delivery.supply_request_id,
            item_key: delivery.item_key,
            carrier: delivery.carrier,
            tracking_number: delivery.tracking_number,
            status: delivery.status,
            tracking_registered: delivery.tracking_registered,
            estimated_delivery_at: delivery.estimated_delivery_at.map(Into::into),
            delivered_at: delivery.delivered_at.map(Into::into),
            created_by: delivery.created_by,
            created_at: delivery.created_at.into(),
            updated_at: delivery.updated_at.into(),
        }
    }
}

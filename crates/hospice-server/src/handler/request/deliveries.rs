//! Delivery request types.
//!
//! Ids arrive as strings so that a malformed id is a 400 naming the field.

use hospice_postgres::model::{Delivery, NewDelivery, UpdateDelivery as UpdateDeliveryModel};
use hospice_postgres::types::{Carrier, DeliveryStatus};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{OptionNormalized, parse_optional_uuid_field, parse_uuid_field};
use crate::handler::{ErrorKind, Result};

/// Request payload to record a delivery.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDelivery {
    /// Patient receiving the delivery (UUID).
    #[validate(length(min = 1, max = 64))]
    pub patient_id: String,

    /// Supply request this delivery fulfils (UUID).
    #[validate(length(max = 64))]
    pub supply_request_id: Option<String>,

    /// Catalog key or free-text item name.
    #[validate(length(min = 1, max = 120))]
    pub item_key: String,

    pub carrier: Option<Carrier>,

    /// Carrier tracking number; must not be blank when given.
    #[validate(length(min = 1, max = 64))]
    pub tracking_number: Option<String>,

    /// Initial status, `pending` when omitted.
    pub status: Option<DeliveryStatus>,

    pub estimated_delivery_at: Option<Timestamp>,
}

/// Ids and tracking fields of a [`CreateDelivery`] after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRefs {
    pub patient_id: Uuid,
    pub supply_request_id: Option<Uuid>,
    pub tracking_number: Option<String>,
}

impl CreateDelivery {
    /// Parses the id fields and the tracking number.
    pub fn refs(&self) -> Result<DeliveryRefs> {
        Ok(DeliveryRefs {
            patient_id: parse_uuid_field("patientId", &self.patient_id)?,
            supply_request_id: parse_optional_uuid_field(
                "supplyRequestId",
                self.supply_request_id.as_deref(),
            )?,
            tracking_number: tracking_number(self.tracking_number.as_deref())?,
        })
    }

    pub fn into_model(
        self,
        agency_id: Uuid,
        refs: DeliveryRefs,
        item_key: &str,
        created_by: Uuid,
    ) -> NewDelivery {
        let status = self.status.unwrap_or_default();
        let delivered_at = status.is_delivered().then(|| Timestamp::now().into());

        NewDelivery {
            agency_id,
            patient_id: refs.patient_id,
            supply_request_id: refs.supply_request_id,
            item_key: item_key.to_owned(),
            carrier: self.carrier,
            tracking_number: refs.tracking_number,
            status,
            estimated_delivery_at: self.estimated_delivery_at.map(Into::into),
            delivered_at,
            created_by,
        }
    }
}

/// Request payload to update a delivery.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDelivery {
    pub carrier: Option<Carrier>,

    /// New tracking number; must not be blank.
    #[validate(length(min = 1, max = 64))]
    pub tracking_number: Option<String>,

    pub status: Option<DeliveryStatus>,

    pub estimated_delivery_at: Option<Timestamp>,

    /// Arrival time; set to now when the status moves to `delivered`.
    pub delivered_at: Option<Timestamp>,
}

impl UpdateDelivery {
    pub fn is_empty(&self) -> bool {
        self.carrier.is_none()
            && self.tracking_number.is_none()
            && self.status.is_none()
            && self.estimated_delivery_at.is_none()
            && self.delivered_at.is_none()
    }

    /// Returns whether the carrier or tracking number changes, which
    /// re-registers the shipment.
    pub fn changes_tracking(&self, current: &Delivery) -> bool {
        let carrier_changed = self.carrier.is_some_and(|c| current.carrier != Some(c));
        let number_changed = self
            .tracking_number
            .as_deref()
            .map(str::trim)
            .is_some_and(|n| current.tracking_number.as_deref() != Some(n));

        carrier_changed || number_changed
    }

    /// Builds the changeset against the stored delivery.
    pub fn into_model(self, current: &Delivery) -> Result<UpdateDeliveryModel> {
        let changes_tracking = self.changes_tracking(current);
        let tracking_number = tracking_number(self.tracking_number.as_deref())?;

        let delivered_at = match (self.status, self.delivered_at) {
            (_, Some(at)) => Some(Some(at.into())),
            (Some(status), None) if status.is_delivered() && current.delivered_at.is_none() => {
                Some(Some(Timestamp::now().into()))
            }
            _ => None,
        };

        Ok(UpdateDeliveryModel {
            carrier: self.carrier.map(Some),
            tracking_number: tracking_number.map(Some),
            status: self.status,
            tracking_registered: changes_tracking.then_some(false),
            estimated_delivery_at: self.estimated_delivery_at.map(|at| Some(at.into())),
            delivered_at,
        })
    }
}

/// Filters for the delivery list.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryListFilter {
    /// Only deliveries for this patient (UUID).
    pub patient_id: Option<String>,
    /// Only deliveries with this status.
    pub status: Option<DeliveryStatus>,
}

impl DeliveryListFilter {
    pub fn patient_id(&self) -> Result<Option<Uuid>> {
        parse_optional_uuid_field("patientId", self.patient_id.as_deref())
    }
}

/// Trims a tracking number; a blank one is a 400.
fn tracking_number(value: Option<&str>) -> Result<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    match Some(value.to_owned()).trimmed_option() {
        Some(trimmed) => Ok(Some(trimmed)),
        None => Err(ErrorKind::BadRequest
            .with_message("Tracking number must not be blank")
            .with_resource("trackingNumber")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(patient_id: &str) -> CreateDelivery {
        CreateDelivery {
            patient_id: patient_id.to_owned(),
            supply_request_id: None,
            item_key: "Gloves - Large".to_owned(),
            carrier: Some(Carrier::Ups),
            tracking_number: Some(" 1Z999 ".to_owned()),
            status: None,
            estimated_delivery_at: None,
        }
    }

    #[test]
    fn malformed_ids_are_named() {
        let error = create("not-a-uuid").refs().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("patientId"));

        let mut request = create(&Uuid::new_v4().to_string());
        request.supply_request_id = Some("42".to_owned());
        let error = request.refs().unwrap_err();
        assert_eq!(error.resource(), Some("supplyRequestId"));
    }

    #[test]
    fn tracking_number_is_trimmed() -> anyhow::Result<()> {
        let refs = create(&Uuid::new_v4().to_string()).refs()?;
        assert_eq!(refs.tracking_number.as_deref(), Some("1Z999"));

        let mut request = create(&Uuid::new_v4().to_string());
        request.tracking_number = Some("   ".to_owned());
        let error = request.refs().unwrap_err();
        assert_eq!(error.resource(), Some("trackingNumber"));
        Ok(())
    }
}

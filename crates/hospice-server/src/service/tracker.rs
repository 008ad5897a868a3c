//! Shipment registration with the parcel tracking service.
//!
//! Registration is best effort: failures are logged and the delivery is
//! stored with `tracking_registered = false`. Nothing retries.

use hospice_postgres::model::Delivery;
use hospice_relay::{RegisterTracking, TrackingClient};

const TRACING_TARGET: &str = "hospice_server::service::tracker";

/// Builds the registration for a delivery with a carrier and tracking number.
pub fn tracking_registration(delivery: &Delivery) -> Option<RegisterTracking> {
    let (carrier, tracking_number) = delivery.tracking()?;
    let registration = RegisterTracking::new(tracking_number, carrier.to_string(), delivery.id)
        .with_metadata(serde_json::json!({
            "agencyId": delivery.agency_id,
            "patientId": delivery.patient_id,
            "itemKey": delivery.item_key,
        }));

    Some(registration)
}

/// Registers the delivery's shipment. Returns whether the service accepted it.
pub async fn register_tracking(client: &TrackingClient, delivery: &Delivery) -> bool {
    let Some(registration) = tracking_registration(delivery) else {
        return false;
    };

    match client.register(&registration).await {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET,
                delivery_id = %delivery.id,
                carrier = %registration.carrier,
                "shipment registered"
            );
            true
        }
        Err(error) if error.is_disabled() => {
            tracing::debug!(
                target: TRACING_TARGET,
                delivery_id = %delivery.id,
                "tracking disabled, registration skipped"
            );
            false
        }
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                delivery_id = %delivery.id,
                error = %error,
                "failed to register shipment"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use hospice_postgres::types::{Carrier, DeliveryStatus};
    use uuid::Uuid;

    use super::*;

    fn delivery(carrier: Option<Carrier>, tracking_number: Option<&str>) -> Delivery {
        let now = jiff::Timestamp::now();
        Delivery {
            id: Uuid::new_v4(),
            agency_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            supply_request_id: None,
            item_key: "oxygen_tubing".into(),
            carrier,
            tracking_number: tracking_number.map(str::to_owned),
            status: DeliveryStatus::Pending,
            tracking_registered: false,
            estimated_delivery_at: None,
            delivered_at: None,
            created_by: Uuid::new_v4(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn registration_needs_carrier_and_number() {
        assert!(tracking_registration(&delivery(None, Some("1Z999"))).is_none());
        assert!(tracking_registration(&delivery(Some(Carrier::Ups), None)).is_none());

        let delivery = delivery(Some(Carrier::Ups), Some("1Z999"));
        let registration = tracking_registration(&delivery).expect("registration");
        assert_eq!(registration.carrier, "ups");
        assert_eq!(registration.reference, delivery.id);
        assert_eq!(registration.metadata["itemKey"], "oxygen_tubing");
    }

    #[tokio::test]
    async fn disabled_client_is_not_registered() {
        let delivery = delivery(Some(Carrier::Fedex), Some("7712"));
        assert!(!register_tracking(&TrackingClient::disabled(), &delivery).await);
    }
}

//! In-app notifications for a patient's family.

use hospice_postgres::model::{NewNotification, Patient};
use hospice_postgres::query::{FamilyMemberRepository, NotificationRepository};
use hospice_postgres::types::NotificationEvent;
use hospice_postgres::{PgConnection, PgResult};

const TRACING_TARGET: &str = "hospice_server::service::notifier";

/// What happened to a patient, addressed to every linked family account.
#[derive(Debug, Clone)]
pub struct FamilyNotice {
    pub event: NotificationEvent,
    pub body: Option<String>,
    pub payload: serde_json::Value,
}

impl FamilyNotice {
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            event,
            body: None,
            payload: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    fn for_account(&self, patient: &Patient, account_id: uuid::Uuid) -> NewNotification {
        let mut payload = self.payload.clone();
        if let Some(object) = payload.as_object_mut() {
            object.insert("patientId".into(), patient.id.to_string().into());
            object.insert("patientName".into(), patient.full_name().into());
        }

        let notification = NewNotification::new(account_id, self.event)
            .with_agency(patient.agency_id)
            .with_payload(payload);
        match &self.body {
            Some(body) => notification.with_body(body.clone()),
            None => notification,
        }
    }
}

/// Writes `notice` for every family account linked to `patient`.
///
/// Returns the number of notifications written.
pub async fn notify_family(
    conn: &mut PgConnection,
    patient: &Patient,
    notice: FamilyNotice,
) -> PgResult<usize> {
    let family = conn.list_patient_family(patient.id).await?;
    if family.is_empty() {
        return Ok(0);
    }

    let notifications = family
        .iter()
        .map(|member| notice.for_account(patient, member.account_id))
        .collect();
    let written = conn.create_notifications(notifications).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        patient_id = %patient.id,
        event = %notice.event,
        written,
        "family notified"
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use hospice_postgres::types::PatientStatus;
    use uuid::Uuid;

    use super::*;

    fn patient() -> Patient {
        let now = jiff::Timestamp::now();
        Patient {
            id: Uuid::new_v4(),
            agency_id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Byron".into(),
            mrn: None,
            diagnosis: None,
            address: None,
            status: PatientStatus::Active,
            admitted_at: now.into(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn notices_carry_the_patient() {
        let patient = patient();
        let account_id = Uuid::new_v4();
        let notice = FamilyNotice::new(NotificationEvent::DeliveryUpdated)
            .with_body("Oxygen tubing is on its way")
            .with_payload(serde_json::json!({ "deliveryId": "d-1" }));

        let notification = notice.for_account(&patient, account_id);
        assert_eq!(notification.account_id, account_id);
        assert_eq!(notification.agency_id, Some(patient.agency_id));
        assert_eq!(notification.payload["patientName"], "Ada Byron");
        assert_eq!(notification.payload["deliveryId"], "d-1");
        assert_eq!(notification.body.as_deref(), Some("Oxygen tubing is on its way"));
    }
}

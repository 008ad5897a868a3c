//! Visit request types.
//!
//! Account and patient ids arrive as strings so that a malformed id is a
//! 400 naming the field instead of a generic body rejection.

use hospice_postgres::model::{NewVisit, UpdateVisit as UpdateVisitModel, Visit};
use hospice_postgres::types::{VisitStatus, VisitType};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{OptionNormalized, parse_optional_uuid_field, parse_uuid_field};
use crate::handler::{ErrorKind, Result};

/// Request payload to schedule or record a visit.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisit {
    /// Patient being visited (UUID).
    #[validate(length(min = 1, max = 64))]
    pub patient_id: String,

    /// Agency member making the visit (UUID).
    #[validate(length(max = 64))]
    pub staff_account_id: Option<String>,

    pub visit_type: VisitType,

    /// Initial status, `scheduled` when omitted.
    pub status: Option<VisitStatus>,

    pub scheduled_at: Timestamp,

    /// Completion time; only for completed visits, defaults to now.
    pub completed_at: Option<Timestamp>,

    #[validate(length(max = 4000))]
    pub notes: Option<String>,
}

/// Ids of a [`CreateVisit`] after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitRefs {
    pub patient_id: Uuid,
    pub staff_account_id: Option<Uuid>,
}

impl CreateVisit {
    /// Parses the id fields and checks the status and completion time agree.
    pub fn refs(&self) -> Result<VisitRefs> {
        let patient_id = parse_uuid_field("patientId", &self.patient_id)?;
        let staff_account_id =
            parse_optional_uuid_field("staffAccountId", self.staff_account_id.as_deref())?;

        let status = self.status.unwrap_or_default();
        completion_time(status, self.completed_at, None, Timestamp::now())?;

        Ok(VisitRefs {
            patient_id,
            staff_account_id,
        })
    }

    pub fn into_model(self, agency_id: Uuid, refs: VisitRefs, created_by: Uuid) -> Result<NewVisit> {
        let status = self.status.unwrap_or_default();
        let completed_at = completion_time(status, self.completed_at, None, Timestamp::now())?;

        Ok(NewVisit {
            agency_id,
            patient_id: refs.patient_id,
            staff_account_id: refs.staff_account_id,
            visit_type: self.visit_type,
            status,
            scheduled_at: self.scheduled_at.into(),
            completed_at: completed_at.map(Into::into),
            notes: self.notes.trimmed_option(),
            created_by,
        })
    }
}

/// Request payload to update a visit.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisit {
    /// Agency member making the visit (UUID); an empty string unassigns.
    #[validate(length(max = 64))]
    pub staff_account_id: Option<String>,

    pub visit_type: Option<VisitType>,

    pub status: Option<VisitStatus>,

    pub scheduled_at: Option<Timestamp>,

    /// Completion time; set to now when a visit is completed without one.
    pub completed_at: Option<Timestamp>,

    /// Visit notes; an empty string clears them.
    #[validate(length(max = 4000))]
    pub notes: Option<String>,
}

impl UpdateVisit {
    pub fn is_empty(&self) -> bool {
        self.staff_account_id.is_none()
            && self.visit_type.is_none()
            && self.status.is_none()
            && self.scheduled_at.is_none()
            && self.completed_at.is_none()
            && self.notes.is_none()
    }

    /// Parsed staff assignment: `None` leaves it, `Some(None)` unassigns.
    pub fn staff_assignment(&self) -> Result<Option<Option<Uuid>>> {
        match self.staff_account_id.as_deref() {
            None => Ok(None),
            Some(value) => parse_optional_uuid_field("staffAccountId", Some(value)).map(Some),
        }
    }

    /// Builds the changeset against the stored visit.
    pub fn into_model(self, current: &Visit) -> Result<UpdateVisitModel> {
        let staff_account_id = self.staff_assignment()?;
        let status = self.status.unwrap_or(current.status);
        let stored = current.completed_at.map(Timestamp::from);
        let completed_at = completion_time(status, self.completed_at, stored, Timestamp::now())?;

        Ok(UpdateVisitModel {
            staff_account_id,
            visit_type: self.visit_type,
            status: self.status,
            scheduled_at: self.scheduled_at.map(Into::into),
            completed_at: (completed_at != stored).then(|| completed_at.map(Into::into)),
            notes: self.notes.map(|notes| Some(notes).trimmed_option()),
        })
    }
}

/// Filters for the visit list.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitListFilter {
    /// Only visits of this patient (UUID).
    pub patient_id: Option<String>,
    /// Only visits with this status.
    pub status: Option<VisitStatus>,
}

impl VisitListFilter {
    pub fn patient_id(&self) -> Result<Option<Uuid>> {
        parse_optional_uuid_field("patientId", self.patient_id.as_deref())
    }
}

/// Resolves the completion time for a visit in `status`.
///
/// Completed visits keep the given or stored time and fall back to `now`.
/// Any other status has no completion time, and sending one is a 400.
fn completion_time(
    status: VisitStatus,
    requested: Option<Timestamp>,
    stored: Option<Timestamp>,
    now: Timestamp,
) -> Result<Option<Timestamp>> {
    if status == VisitStatus::Completed {
        return Ok(Some(requested.or(stored).unwrap_or(now)));
    }

    if requested.is_some() {
        return Err(ErrorKind::BadRequest
            .with_message("completedAt is only accepted for completed visits")
            .with_resource("completedAt"));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(patient_id: &str, status: Option<VisitStatus>) -> CreateVisit {
        CreateVisit {
            patient_id: patient_id.to_owned(),
            staff_account_id: None,
            visit_type: VisitType::Nursing,
            status,
            scheduled_at: Timestamp::now(),
            completed_at: None,
            notes: None,
        }
    }

    #[test]
    fn malformed_patient_id_is_named() {
        let error = create("12345", None).refs().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("patientId"));
    }

    #[test]
    fn malformed_staff_id_is_named() {
        let mut request = create(&Uuid::new_v4().to_string(), None);
        request.staff_account_id = Some("nurse-1".to_owned());

        let error = request.refs().unwrap_err();
        assert_eq!(error.resource(), Some("staffAccountId"));
    }

    #[test]
    fn completed_visits_get_a_completion_time() -> anyhow::Result<()> {
        let now = Timestamp::now();
        assert_eq!(completion_time(VisitStatus::Completed, None, None, now)?, Some(now));

        let earlier = now - jiff::SignedDuration::from_hours(2);
        assert_eq!(
            completion_time(VisitStatus::Completed, None, Some(earlier), now)?,
            Some(earlier)
        );
        assert_eq!(completion_time(VisitStatus::Cancelled, None, Some(earlier), now)?, None);
        Ok(())
    }

    #[test]
    fn completion_time_needs_completed_status() {
        let error = completion_time(VisitStatus::Scheduled, Some(Timestamp::now()), None, Timestamp::now())
            .unwrap_err();
        assert_eq!(error.resource(), Some("completedAt"));
    }
}

//! Visit response types.

use hospice_postgres::model;
use hospice_postgres::types::{VisitStatus, VisitType};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled or past patient visit.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub visit_id: Uuid,
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    pub staff_account_id: Option<Uuid>,
    pub visit_type: VisitType,
    pub status: VisitStatus,
    pub scheduled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<model::Visit> for Visit {
    fn from(visit: model::Visit) -> Self {
        Self {
            visit_id: visit.id,
            agency_id: visit.agency_id,
            patient_id: visit.patient_id,
            staff_account_id: visit.staff_account_id,
            visit_type: visit.visit_type,
            status: visit.status,
            scheduled_at: visit.scheduled_at.into(),
            completed_at: visit.completed_at.map(Into::into),
            notes: visit.notes,
            created_by: visit.created_by,
            created_at: visit.created_at.into(),
            updated_at: visit.updated_at.into(),
        }
    }
}

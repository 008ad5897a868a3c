use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::visits;
use crate::types::{VisitStatus, VisitType};

/// Scheduled care visit to a patient.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Visit {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    /// Staff member assigned to the visit.
    pub staff_account_id: Option<Uuid>,
    pub visit_type: VisitType,
    pub status: VisitStatus,
    pub scheduled_at: Timestamp,
    /// Set whenever the status is completed.
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for scheduling a visit.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewVisit {
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    pub staff_account_id: Option<Uuid>,
    pub visit_type: VisitType,
    pub status: VisitStatus,
    pub scheduled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_by: Uuid,
}

/// Partial visit update.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateVisit {
    pub staff_account_id: Option<Option<Uuid>>,
    pub visit_type: Option<VisitType>,
    pub status: Option<VisitStatus>,
    pub scheduled_at: Option<Timestamp>,
    pub completed_at: Option<Option<Timestamp>>,
    pub notes: Option<Option<String>>,
}

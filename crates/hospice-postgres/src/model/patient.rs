use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::patients;
use crate::types::PatientStatus;

/// Patient under the care of an agency.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Patient {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Medical record number, unique within the agency when present.
    pub mrn: Option<String>,
    pub diagnosis: Option<String>,
    pub address: Option<String>,
    pub status: PatientStatus,
    pub admitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for admitting a patient.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPatient {
    pub agency_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub mrn: Option<String>,
    pub diagnosis: Option<String>,
    pub address: Option<String>,
    pub admitted_at: Option<Timestamp>,
}

/// Partial patient update.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdatePatient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mrn: Option<Option<String>>,
    pub diagnosis: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub status: Option<PatientStatus>,
}

impl Patient {
    /// Returns the display name used in notifications and emails.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::family_members;

/// Link between a family account and the patient they follow.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = family_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FamilyMember {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    /// Free-text relationship to the patient, such as "daughter".
    pub relationship: Option<String>,
    pub created_at: Timestamp,
}

/// Data for linking a family account to a patient.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = family_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFamilyMember {
    pub patient_id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub relationship: Option<String>,
}

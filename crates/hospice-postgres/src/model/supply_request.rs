use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::supply_requests;
use crate::types::SupplyRequestStatus;

/// Item a family member asked the agency to send.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = supply_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SupplyRequest {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    pub requested_by: Uuid,
    /// Normalized catalog key.
    pub item_key: String,
    /// Catalog display name at the time of the request.
    pub item_name: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub status: SupplyRequestStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating a supply request.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = supply_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSupplyRequest {
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    pub requested_by: Uuid,
    pub item_key: String,
    pub item_name: String,
    pub quantity: i32,
    pub notes: Option<String>,
}

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::agencies;

/// Hospice agency, the tenant every patient and member belongs to.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = agencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Agency {
    pub id: Uuid,
    pub name: String,
    /// URL-safe unique identifier derived from the name.
    pub slug: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// IANA timezone name used for schedules.
    pub timezone: String,
    pub license_number: Option<String>,
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating an agency.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAgency {
    pub name: String,
    pub slug: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub timezone: String,
    pub license_number: Option<String>,
    pub created_by: Uuid,
}

/// Partial agency profile update.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = agencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAgency {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub timezone: Option<String>,
    pub license_number: Option<Option<String>>,
}

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::agency_users;
use crate::types::{AgencyRole, JobRole};

/// Membership of an account in an agency.
///
/// An account belongs to at most one agency.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = agency_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AgencyUser {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub account_id: Uuid,
    pub role: AgencyRole,
    pub job_role: JobRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for adding a member.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agency_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAgencyUser {
    pub agency_id: Uuid,
    pub account_id: Uuid,
    pub role: AgencyRole,
    pub job_role: JobRole,
}

/// Role change for a member.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = agency_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAgencyUser {
    pub role: Option<AgencyRole>,
    pub job_role: Option<JobRole>,
}

impl AgencyUser {
    /// Returns whether the member administers the agency.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

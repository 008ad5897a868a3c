//! Role of a member within an agency.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Membership role inside one agency.
///
/// Corresponds to the `AGENCY_ROLE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::AgencyRole"]
#[strum(serialize_all = "snake_case")]
pub enum AgencyRole {
    /// Manages the agency profile, team, invitations and dashboards.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    Admin,

    /// Works with patients, visits, supplies and messages.
    #[db_rename = "staff"]
    #[serde(rename = "staff")]
    #[default]
    Staff,
}

impl AgencyRole {
    /// Returns whether this role administers the agency.
    #[inline]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

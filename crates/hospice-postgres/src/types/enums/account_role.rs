//! Platform-wide account role.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Global role of an account, mirrored into the session token.
///
/// Corresponds to the `ACCOUNT_ROLE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::AccountRole"]
#[strum(serialize_all = "snake_case")]
pub enum AccountRole {
    /// Platform operator with access to every agency.
    #[db_rename = "super_admin"]
    #[serde(rename = "super_admin")]
    SuperAdmin,

    /// Administrator of a single hospice agency.
    #[db_rename = "agency_admin"]
    #[serde(rename = "agency_admin")]
    AgencyAdmin,

    /// Clinical or administrative staff of a single agency.
    #[db_rename = "staff"]
    #[serde(rename = "staff")]
    Staff,

    /// Family member invited to follow one patient.
    #[db_rename = "family"]
    #[serde(rename = "family")]
    #[default]
    Family,
}

impl AccountRole {
    /// Returns whether this is the platform super-admin role.
    #[inline]
    pub const fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Returns whether accounts with this role work inside an agency.
    #[inline]
    pub const fn is_agency_member(self) -> bool {
        matches!(self, Self::AgencyAdmin | Self::Staff)
    }

    /// Returns whether this is the family role.
    #[inline]
    pub const fn is_family(self) -> bool {
        matches!(self, Self::Family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_database_names() {
        assert_eq!(AccountRole::SuperAdmin.to_string(), "super_admin");
        assert_eq!("agency_admin".parse::<AccountRole>().ok(), Some(AccountRole::AgencyAdmin));
    }

    #[test]
    fn agency_membership() {
        assert!(AccountRole::Staff.is_agency_member());
        assert!(AccountRole::AgencyAdmin.is_agency_member());
        assert!(!AccountRole::Family.is_agency_member());
        assert!(!AccountRole::SuperAdmin.is_agency_member());
    }
}

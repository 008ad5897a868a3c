use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::AccountRole;

/// What accepting an invitation grants.
///
/// Corresponds to the `INVITATION_KIND` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::InvitationKind"]
#[strum(serialize_all = "snake_case")]
pub enum InvitationKind {
    /// A super-admin invites the first administrator of a new agency.
    #[db_rename = "facility"]
    #[serde(rename = "facility")]
    Facility,

    /// An agency admin invites a colleague.
    #[db_rename = "team"]
    #[serde(rename = "team")]
    Team,

    /// Agency staff invite a family member of one patient.
    #[db_rename = "family"]
    #[serde(rename = "family")]
    Family,
}

impl InvitationKind {
    /// Returns the account role granted when a new account accepts.
    ///
    /// Team invitations carry their own agency role, which decides between
    /// admin and staff.
    pub const fn account_role(self, agency_admin: bool) -> AccountRole {
        match self {
            Self::Facility => AccountRole::AgencyAdmin,
            Self::Team if agency_admin => AccountRole::AgencyAdmin,
            Self::Team => AccountRole::Staff,
            Self::Family => AccountRole::Family,
        }
    }
}

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle status of a visit.
///
/// Corresponds to the `VISIT_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::VisitStatus"]
#[strum(serialize_all = "snake_case")]
pub enum VisitStatus {
    #[db_rename = "scheduled"]
    #[serde(rename = "scheduled")]
    #[default]
    Scheduled,

    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    Completed,

    #[db_rename = "cancelled"]
    #[serde(rename = "cancelled")]
    Cancelled,

    #[db_rename = "missed"]
    #[serde(rename = "missed")]
    Missed,
}

impl VisitStatus {
    /// Returns whether the visit can no longer change.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Review status of a family supply request.
///
/// Corresponds to the `SUPPLY_REQUEST_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::SupplyRequestStatus"]
#[strum(serialize_all = "snake_case")]
pub enum SupplyRequestStatus {
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,

    #[db_rename = "approved"]
    #[serde(rename = "approved")]
    Approved,

    #[db_rename = "fulfilled"]
    #[serde(rename = "fulfilled")]
    Fulfilled,

    #[db_rename = "cancelled"]
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl SupplyRequestStatus {
    /// Returns whether a request in this status may move to `next`.
    pub const fn can_transition_to(self, next: Self) -> bool {
        use SupplyRequestStatus::{Approved, Cancelled, Fulfilled, Pending};

        matches!(
            (self, next),
            (Pending, Approved | Cancelled | Fulfilled) | (Approved, Fulfilled | Cancelled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SupplyRequestStatus::*;

    #[test]
    fn transitions() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Fulfilled));
        assert!(!Fulfilled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Approved));
        assert!(!Pending.can_transition_to(Pending));
    }
}

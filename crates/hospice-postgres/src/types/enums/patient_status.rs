use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Care status of a patient.
///
/// Corresponds to the `PATIENT_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::PatientStatus"]
#[strum(serialize_all = "snake_case")]
pub enum PatientStatus {
    #[db_rename = "active"]
    #[serde(rename = "active")]
    #[default]
    Active,

    #[db_rename = "discharged"]
    #[serde(rename = "discharged")]
    Discharged,

    #[db_rename = "deceased"]
    #[serde(rename = "deceased")]
    Deceased,
}

impl PatientStatus {
    /// Returns whether the patient is currently under care.
    #[inline]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

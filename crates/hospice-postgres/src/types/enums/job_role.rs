//! Clinical job role of agency staff.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Job function of an agency member, shown to families.
///
/// Corresponds to the `JOB_ROLE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::JobRole"]
#[strum(serialize_all = "snake_case")]
pub enum JobRole {
    #[db_rename = "nurse"]
    #[serde(rename = "nurse")]
    Nurse,

    #[db_rename = "aide"]
    #[serde(rename = "aide")]
    Aide,

    #[db_rename = "social_worker"]
    #[serde(rename = "social_worker")]
    SocialWorker,

    #[db_rename = "chaplain"]
    #[serde(rename = "chaplain")]
    Chaplain,

    #[db_rename = "physician"]
    #[serde(rename = "physician")]
    Physician,

    #[db_rename = "coordinator"]
    #[serde(rename = "coordinator")]
    Coordinator,

    #[db_rename = "other"]
    #[serde(rename = "other")]
    #[default]
    Other,
}

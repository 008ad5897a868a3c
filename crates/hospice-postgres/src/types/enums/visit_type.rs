use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Discipline of a scheduled visit.
///
/// Corresponds to the `VISIT_TYPE` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::VisitType"]
#[strum(serialize_all = "snake_case")]
pub enum VisitType {
    #[db_rename = "nursing"]
    #[serde(rename = "nursing")]
    Nursing,

    #[db_rename = "aide"]
    #[serde(rename = "aide")]
    Aide,

    #[db_rename = "social_work"]
    #[serde(rename = "social_work")]
    SocialWork,

    #[db_rename = "chaplain"]
    #[serde(rename = "chaplain")]
    Chaplain,

    #[db_rename = "physician"]
    #[serde(rename = "physician")]
    Physician,

    #[db_rename = "volunteer"]
    #[serde(rename = "volunteer")]
    Volunteer,
}

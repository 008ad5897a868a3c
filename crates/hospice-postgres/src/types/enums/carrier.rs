use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Parcel carrier of a delivery.
///
/// Corresponds to the `CARRIER` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::Carrier"]
#[strum(serialize_all = "snake_case")]
pub enum Carrier {
    #[db_rename = "ups"]
    #[serde(rename = "ups")]
    Ups,

    #[db_rename = "usps"]
    #[serde(rename = "usps")]
    Usps,

    #[db_rename = "fedex"]
    #[serde(rename = "fedex")]
    Fedex,

    #[db_rename = "dhl"]
    #[serde(rename = "dhl")]
    Dhl,

    #[db_rename = "other"]
    #[serde(rename = "other")]
    Other,
}

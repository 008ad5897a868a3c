//! Agency response types.

use hospice_postgres::model;
use hospice_postgres::query::PlatformOverview as OverviewModel;
use hospice_postgres::types::AccountRole;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a hospice agency.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub agency_id: Uuid,
    pub name: String,
    /// URL-friendly unique identifier.
    pub slug: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// IANA time zone used for schedules.
    pub timezone: String,
    pub license_number: Option<String>,
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<model::Agency> for Agency {
    fn from(agency: model::Agency) -> Self {
        Self {
            agency_id: agency.id,
            name: agency.name,
            slug: agency.slug,
            phone: agency.phone,
            address: agency.address,
            timezone: agency.timezone,
            license_number: agency.license_number,
            created_by: agency.created_by,
            created_at: agency.created_at.into(),
            updated_at: agency.updated_at.into(),
        }
    }
}

/// Account count for one role.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleCount {
    pub role: AccountRole,
    pub count: i64,
}

/// Platform-wide counters for super admins.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOverview {
    pub agencies: i64,
    pub accounts_by_role: Vec<RoleCount>,
    pub active_patients: i64,
}

impl From<OverviewModel> for PlatformOverview {
    fn from(overview: OverviewModel) -> Self {
        Self {
            agencies: overview.agencies,
            accounts_by_role: overview
                .accounts_by_role
                .into_iter()
                .map(|(role, count)| RoleCount { role, count })
                .collect(),
            active_patients: overview.active_patients,
        }
    }
}

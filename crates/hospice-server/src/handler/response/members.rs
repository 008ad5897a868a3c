//! Agency member response types.

use hospice_postgres::model;
use hospice_postgres::types::{AccountRole, AgencyRole, JobRole};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Agency member with account details.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub account_id: Uuid,
    pub agency_id: Uuid,
    pub email_address: String,
    pub display_name: String,
    pub account_role: AccountRole,
    pub role: AgencyRole,
    pub job_role: JobRole,
    pub joined_at: Timestamp,
}

impl From<(model::AgencyUser, model::Account)> for Member {
    fn from((member, account): (model::AgencyUser, model::Account)) -> Self {
        Self {
            account_id: member.account_id,
            agency_id: member.agency_id,
            email_address: account.email,
            display_name: account.display_name,
            account_role: account.role,
            role: member.role,
            job_role: member.job_role,
            joined_at: member.created_at.into(),
        }
    }
}

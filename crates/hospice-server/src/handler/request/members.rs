//! Agency member request types.

use hospice_postgres::model::UpdateAgencyUser;
use hospice_postgres::types::{AgencyRole, JobRole};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload to change a member's agency role or job role.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMember {
    /// New agency role.
    pub role: Option<AgencyRole>,
    /// New job role.
    pub job_role: Option<JobRole>,
}

impl UpdateMember {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.job_role.is_none()
    }

    pub fn into_model(self) -> UpdateAgencyUser {
        UpdateAgencyUser {
            role: self.role,
            job_role: self.job_role,
        }
    }
}

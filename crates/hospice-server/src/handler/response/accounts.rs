//! Account response types.

use hospice_postgres::model;
use hospice_postgres::types::{AccountRole, AgencyRole, JobRole, OnboardingStep};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an account.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier of the account.
    pub account_id: Uuid,
    /// Email address, stored lowercase.
    pub email_address: String,
    /// Display name of the account holder.
    pub display_name: String,
    /// Platform role.
    pub role: AccountRole,
    /// Recorded onboarding step.
    pub onboarding_step: OnboardingStep,
    /// Whether a password has been set.
    pub has_password: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<model::Account> for Account {
    fn from(account: model::Account) -> Self {
        Self {
            account_id: account.id,
            has_password: account.has_password(),
            email_address: account.email,
            display_name: account.display_name,
            role: account.role,
            onboarding_step: account.onboarding_step,
            created_at: account.created_at.into(),
            updated_at: account.updated_at.into(),
        }
    }
}

/// Agency membership of an account.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub agency_id: Uuid,
    pub role: AgencyRole,
    pub job_role: JobRole,
    pub joined_at: Timestamp,
}

impl From<model::AgencyUser> for Membership {
    fn from(member: model::AgencyUser) -> Self {
        Self {
            agency_id: member.agency_id,
            role: member.role,
            job_role: member.job_role,
            joined_at: member.created_at.into(),
        }
    }
}

/// The caller's account with what it is attached to.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAccount {
    #[serde(flatten)]
    pub account: Account,
    /// Agency membership of staff and admins.
    pub membership: Option<Membership>,
    /// Patients a family account follows.
    pub patient_ids: Vec<Uuid>,
}

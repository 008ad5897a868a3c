//! Onboarding response types.

use hospice_postgres::types::{AccountRole, OnboardingStep};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Agency, CreatedInvitation};
use crate::service::{OnboardingAction, OnboardingProgress};

/// Where the caller stands in onboarding.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub step: OnboardingStep,
    pub role: AccountRole,
    /// A password must be set before anything else.
    pub needs_password: bool,
    pub completed: bool,
    /// Actions that would be accepted right now.
    pub allowed_actions: Vec<OnboardingAction>,
}

impl From<OnboardingProgress> for OnboardingStatus {
    fn from(progress: OnboardingProgress) -> Self {
        Self {
            step: progress.step,
            role: progress.role,
            needs_password: progress.needs_password(),
            completed: progress.is_completed(),
            allowed_actions: progress.allowed_actions(),
        }
    }
}

/// Result of the facility step.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredFacility {
    pub agency: Agency,
    pub status: OnboardingStatus,
}

/// Result of the staff invitation step.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffInvites {
    /// One entry per invitation, in request order.
    pub invites: Vec<CreatedInvitation>,
    pub status: OnboardingStatus,
}

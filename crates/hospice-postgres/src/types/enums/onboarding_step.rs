//! First-login onboarding progress.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Recorded onboarding step of an account.
///
/// Steps are ordered; an account only ever moves forward.
/// Corresponds to the `ONBOARDING_STEP` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::OnboardingStep"]
#[strum(serialize_all = "snake_case")]
pub enum OnboardingStep {
    /// The account was invited and has not chosen a password yet.
    #[db_rename = "needs_password_setup"]
    #[serde(rename = "needs_password_setup")]
    #[default]
    NeedsPasswordSetup,

    /// The agency profile has been filled in.
    #[db_rename = "facility_configured"]
    #[serde(rename = "facility_configured")]
    FacilityConfigured,

    /// At least one batch of staff invitations was sent.
    #[db_rename = "staff_invited"]
    #[serde(rename = "staff_invited")]
    StaffInvited,

    /// Onboarding is finished.
    #[db_rename = "onboarding_completed"]
    #[serde(rename = "onboarding_completed")]
    OnboardingCompleted,
}

impl OnboardingStep {
    /// Returns whether the account still has to choose a password.
    #[inline]
    pub const fn needs_password(self) -> bool {
        matches!(self, Self::NeedsPasswordSetup)
    }

    /// Returns whether onboarding is finished.
    #[inline]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::OnboardingCompleted)
    }

    /// Returns the later of two steps, so a re-run step never regresses.
    #[inline]
    #[must_use]
    pub fn advance_to(self, step: Self) -> Self {
        self.max(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_ordered() {
        assert!(OnboardingStep::NeedsPasswordSetup < OnboardingStep::FacilityConfigured);
        assert!(OnboardingStep::FacilityConfigured < OnboardingStep::StaffInvited);
        assert!(OnboardingStep::StaffInvited < OnboardingStep::OnboardingCompleted);
    }

    #[test]
    fn advance_never_regresses() {
        let step = OnboardingStep::StaffInvited;
        assert_eq!(
            step.advance_to(OnboardingStep::FacilityConfigured),
            OnboardingStep::StaffInvited
        );
        assert_eq!(
            step.advance_to(OnboardingStep::OnboardingCompleted),
            OnboardingStep::OnboardingCompleted
        );
    }
}

//! First-login onboarding state machine.
//!
//! Agency admins walk `password → facility → staff invites (optional) →
//! complete`. Staff and family members set a password and are done.
//! Every step except the password is refused with 409 while the account
//! has no password, and a step that is run again never moves the recorded
//! step backwards.

use hospice_postgres::model::Account;
use hospice_postgres::types::{AccountRole, OnboardingStep};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::handler::{ErrorKind, Result};

/// Onboarding actions an account can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, JsonSchema, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OnboardingAction {
    SetPassword,
    ConfigureFacility,
    InviteStaff,
    Complete,
}

/// Onboarding position of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingProgress {
    pub role: AccountRole,
    pub step: OnboardingStep,
    pub has_password: bool,
}

impl OnboardingProgress {
    pub fn new(role: AccountRole, step: OnboardingStep, has_password: bool) -> Self {
        Self {
            role,
            step,
            has_password,
        }
    }

    pub fn of(account: &Account) -> Self {
        Self::new(account.role, account.onboarding_step, account.has_password())
    }

    #[inline]
    pub fn needs_password(&self) -> bool {
        !self.has_password
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.has_password && self.step.is_completed()
    }

    #[inline]
    fn is_admin(&self) -> bool {
        self.role == AccountRole::AgencyAdmin
    }

    /// Returns the step to record after `action`, or why it is refused.
    pub fn apply(&self, action: OnboardingAction) -> Result<OnboardingStep> {
        if action == OnboardingAction::SetPassword {
            let next = match self.role {
                AccountRole::AgencyAdmin => self.step,
                _ => OnboardingStep::OnboardingCompleted,
            };
            return Ok(self.step.advance_to(next));
        }

        if !self.has_password {
            return Err(ErrorKind::Conflict
                .with_message("Set a password before continuing onboarding")
                .with_resource("onboarding")
                .with_suggestion("POST /onboarding/password first"));
        }

        match action {
            OnboardingAction::SetPassword => Ok(self.step),
            OnboardingAction::ConfigureFacility => {
                self.require_admin(action)?;
                Ok(self.step.advance_to(OnboardingStep::FacilityConfigured))
            }
            OnboardingAction::InviteStaff => {
                self.require_admin(action)?;
                self.require_facility()?;
                Ok(self.step.advance_to(OnboardingStep::StaffInvited))
            }
            OnboardingAction::Complete => {
                if self.is_admin() {
                    self.require_facility()?;
                }
                Ok(OnboardingStep::OnboardingCompleted)
            }
        }
    }

    /// Returns the actions [`Self::apply`] would accept.
    pub fn allowed_actions(&self) -> Vec<OnboardingAction> {
        OnboardingAction::iter()
            .filter(|action| self.apply(*action).is_ok())
            .collect()
    }

    fn require_admin(&self, action: OnboardingAction) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }

        Err(ErrorKind::Forbidden
            .with_message(format!("Only agency admins can {}", action.to_string().replace('_', " ")))
            .with_resource("onboarding"))
    }

    fn require_facility(&self) -> Result<()> {
        if self.step >= OnboardingStep::FacilityConfigured {
            return Ok(());
        }

        Err(ErrorKind::Conflict
            .with_message("Configure the facility before this step")
            .with_resource("onboarding")
            .with_suggestion("PUT /onboarding/facility first"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(step: OnboardingStep, has_password: bool) -> OnboardingProgress {
        OnboardingProgress::new(AccountRole::AgencyAdmin, step, has_password)
    }

    #[test]
    fn nothing_skips_password_setup() {
        let progress = admin(OnboardingStep::NeedsPasswordSetup, false);

        for action in [
            OnboardingAction::ConfigureFacility,
            OnboardingAction::InviteStaff,
            OnboardingAction::Complete,
        ] {
            let error = progress.apply(action).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Conflict, "{action}");
        }

        assert_eq!(progress.allowed_actions(), vec![OnboardingAction::SetPassword]);
    }

    #[test]
    fn admin_walks_every_step() -> anyhow::Result<()> {
        let mut step = admin(OnboardingStep::NeedsPasswordSetup, false)
            .apply(OnboardingAction::SetPassword)?;
        assert_eq!(step, OnboardingStep::NeedsPasswordSetup);

        let error = admin(step, true).apply(OnboardingAction::Complete).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Conflict);

        step = admin(step, true).apply(OnboardingAction::ConfigureFacility)?;
        assert_eq!(step, OnboardingStep::FacilityConfigured);

        step = admin(step, true).apply(OnboardingAction::InviteStaff)?;
        assert_eq!(step, OnboardingStep::StaffInvited);

        step = admin(step, true).apply(OnboardingAction::Complete)?;
        assert_eq!(step, OnboardingStep::OnboardingCompleted);
        Ok(())
    }

    #[test]
    fn staff_invites_are_optional() -> anyhow::Result<()> {
        let step = admin(OnboardingStep::FacilityConfigured, true).apply(OnboardingAction::Complete)?;
        assert_eq!(step, OnboardingStep::OnboardingCompleted);
        Ok(())
    }

    #[test]
    fn rerunning_a_step_never_regresses() -> anyhow::Result<()> {
        let progress = admin(OnboardingStep::OnboardingCompleted, true);
        assert_eq!(
            progress.apply(OnboardingAction::ConfigureFacility)?,
            OnboardingStep::OnboardingCompleted
        );
        assert_eq!(
            progress.apply(OnboardingAction::SetPassword)?,
            OnboardingStep::OnboardingCompleted
        );
        Ok(())
    }

    #[test]
    fn staff_and_family_complete_after_password() -> anyhow::Result<()> {
        for role in [AccountRole::Staff, AccountRole::Family] {
            let progress = OnboardingProgress::new(role, OnboardingStep::NeedsPasswordSetup, false);
            assert_eq!(
                progress.apply(OnboardingAction::SetPassword)?,
                OnboardingStep::OnboardingCompleted
            );

            let progress = OnboardingProgress::new(role, OnboardingStep::OnboardingCompleted, true);
            let error = progress.apply(OnboardingAction::ConfigureFacility).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Forbidden);
            let error = progress.apply(OnboardingAction::InviteStaff).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Forbidden);
        }
        Ok(())
    }
}

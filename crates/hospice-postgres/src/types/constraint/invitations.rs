//! Invitations table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Invitations table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum InvitationConstraints {
    // Invitations validation constraints
    #[strum(serialize = "invitations_email_lowercase")]
    EmailLowercase,
    #[strum(serialize = "invitations_token_length")]
    TokenLength,

    // Invitations chronological constraints
    #[strum(serialize = "invitations_expires_after_created")]
    ExpiresAfterCreated,

    // Invitations business logic constraints
    #[strum(serialize = "invitations_team_has_agency")]
    TeamHasAgency,
    #[strum(serialize = "invitations_family_has_patient")]
    FamilyHasPatient,
    #[strum(serialize = "invitations_accepted_has_account")]
    AcceptedHasAccount,

    // Invitations uniqueness constraints
    #[strum(serialize = "invitations_token_unique_idx")]
    TokenUnique,
}

impl InvitationConstraints {
    /// Creates a new [`InvitationConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            InvitationConstraints::EmailLowercase
            | InvitationConstraints::TokenLength => ConstraintCategory::Validation,
            InvitationConstraints::ExpiresAfterCreated => ConstraintCategory::Chronological,
            InvitationConstraints::TeamHasAgency
            | InvitationConstraints::FamilyHasPatient
            | InvitationConstraints::AcceptedHasAccount => ConstraintCategory::BusinessLogic,
            InvitationConstraints::TokenUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<InvitationConstraints> for String {
    #[inline]
    fn from(val: InvitationConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for InvitationConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

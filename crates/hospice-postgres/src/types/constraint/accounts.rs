//! Accounts table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Accounts table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountConstraints {
    // Accounts validation constraints
    #[strum(serialize = "accounts_email_lowercase")]
    EmailLowercase,
    #[strum(serialize = "accounts_email_format")]
    EmailFormat,
    #[strum(serialize = "accounts_email_length_max")]
    EmailLengthMax,
    #[strum(serialize = "accounts_display_name_length")]
    DisplayNameLength,
    #[strum(serialize = "accounts_password_hash_not_empty")]
    PasswordHashNotEmpty,

    // Accounts chronological constraints
    #[strum(serialize = "accounts_updated_after_created")]
    UpdatedAfterCreated,

    // Accounts uniqueness constraints
    #[strum(serialize = "accounts_email_unique_idx")]
    EmailUnique,
}

impl AccountConstraints {
    /// Creates a new [`AccountConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            AccountConstraints::EmailLowercase
            | AccountConstraints::EmailFormat
            | AccountConstraints::EmailLengthMax
            | AccountConstraints::DisplayNameLength
            | AccountConstraints::PasswordHashNotEmpty => ConstraintCategory::Validation,
            AccountConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
            AccountConstraints::EmailUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<AccountConstraints> for String {
    #[inline]
    fn from(val: AccountConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AccountConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

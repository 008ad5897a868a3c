//! Account sessions table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Account sessions table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountSessionConstraints {
    #[strum(serialize = "account_sessions_expires_after_created")]
    ExpiresAfterCreated,
}

impl AccountSessionConstraints {
    /// Creates a new [`AccountSessionConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Chronological
    }
}

impl From<AccountSessionConstraints> for String {
    #[inline]
    fn from(val: AccountSessionConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AccountSessionConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

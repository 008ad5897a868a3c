//! Agency users table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Agency users table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AgencyUserConstraints {
    #[strum(serialize = "agency_users_account_unique_idx")]
    AccountUnique,
}

impl AgencyUserConstraints {
    /// Creates a new [`AgencyUserConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Uniqueness
    }
}

impl From<AgencyUserConstraints> for String {
    #[inline]
    fn from(val: AgencyUserConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AgencyUserConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

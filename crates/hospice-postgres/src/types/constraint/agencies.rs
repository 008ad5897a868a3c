//! Agencies table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Agencies table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AgencyConstraints {
    // Agencies validation constraints
    #[strum(serialize = "agencies_name_length")]
    NameLength,
    #[strum(serialize = "agencies_slug_format")]
    SlugFormat,
    #[strum(serialize = "agencies_phone_length_max")]
    PhoneLengthMax,
    #[strum(serialize = "agencies_timezone_not_empty")]
    TimezoneNotEmpty,

    // Agencies uniqueness constraints
    #[strum(serialize = "agencies_slug_unique_idx")]
    SlugUnique,
}

impl AgencyConstraints {
    /// Creates a new [`AgencyConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            AgencyConstraints::NameLength
            | AgencyConstraints::SlugFormat
            | AgencyConstraints::PhoneLengthMax
            | AgencyConstraints::TimezoneNotEmpty => ConstraintCategory::Validation,
            AgencyConstraints::SlugUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<AgencyConstraints> for String {
    #[inline]
    fn from(val: AgencyConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AgencyConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

//! Family members table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Family members table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum FamilyMemberConstraints {
    #[strum(serialize = "family_members_full_name_not_empty")]
    FullNameNotEmpty,
    #[strum(serialize = "family_members_patient_account_unique_idx")]
    PatientAccountUnique,
}

impl FamilyMemberConstraints {
    /// Creates a new [`FamilyMemberConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            FamilyMemberConstraints::FullNameNotEmpty => ConstraintCategory::Validation,
            FamilyMemberConstraints::PatientAccountUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<FamilyMemberConstraints> for String {
    #[inline]
    fn from(val: FamilyMemberConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for FamilyMemberConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

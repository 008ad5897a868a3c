//! Patients table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Patients table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum PatientConstraints {
    // Patients validation constraints
    #[strum(serialize = "patients_first_name_not_empty")]
    FirstNameNotEmpty,
    #[strum(serialize = "patients_last_name_not_empty")]
    LastNameNotEmpty,

    // Patients uniqueness constraints
    #[strum(serialize = "patients_agency_mrn_unique_idx")]
    AgencyMrnUnique,
}

impl PatientConstraints {
    /// Creates a new [`PatientConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            PatientConstraints::FirstNameNotEmpty
            | PatientConstraints::LastNameNotEmpty => ConstraintCategory::Validation,
            PatientConstraints::AgencyMrnUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<PatientConstraints> for String {
    #[inline]
    fn from(val: PatientConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for PatientConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

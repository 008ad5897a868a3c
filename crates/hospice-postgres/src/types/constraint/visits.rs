//! Visits table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Visits table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum VisitConstraints {
    #[strum(serialize = "visits_notes_length_max")]
    NotesLengthMax,
    #[strum(serialize = "visits_completed_has_timestamp")]
    CompletedHasTimestamp,
}

impl VisitConstraints {
    /// Creates a new [`VisitConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            VisitConstraints::NotesLengthMax => ConstraintCategory::Validation,
            VisitConstraints::CompletedHasTimestamp => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<VisitConstraints> for String {
    #[inline]
    fn from(val: VisitConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for VisitConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

//! Supply requests table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Supply requests table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum SupplyRequestConstraints {
    // Supply requests validation constraints
    #[strum(serialize = "supply_requests_quantity_range")]
    QuantityRange,
    #[strum(serialize = "supply_requests_item_key_format")]
    ItemKeyFormat,
    #[strum(serialize = "supply_requests_notes_length_max")]
    NotesLengthMax,
}

impl SupplyRequestConstraints {
    /// Creates a new [`SupplyRequestConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Validation
    }
}

impl From<SupplyRequestConstraints> for String {
    #[inline]
    fn from(val: SupplyRequestConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for SupplyRequestConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

//! Deliveries table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Deliveries table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum DeliveryConstraints {
    // Deliveries validation constraints
    #[strum(serialize = "deliveries_item_key_format")]
    ItemKeyFormat,
    #[strum(serialize = "deliveries_tracking_number_not_empty")]
    TrackingNumberNotEmpty,

    // Deliveries business logic constraints
    #[strum(serialize = "deliveries_delivered_has_timestamp")]
    DeliveredHasTimestamp,
}

impl DeliveryConstraints {
    /// Creates a new [`DeliveryConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            DeliveryConstraints::ItemKeyFormat
            | DeliveryConstraints::TrackingNumberNotEmpty => ConstraintCategory::Validation,
            DeliveryConstraints::DeliveredHasTimestamp => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<DeliveryConstraints> for String {
    #[inline]
    fn from(val: DeliveryConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for DeliveryConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

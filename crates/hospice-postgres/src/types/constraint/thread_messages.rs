//! Thread messages table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Thread messages table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ThreadMessageConstraints {
    #[strum(serialize = "thread_messages_body_length")]
    BodyLength,
}

impl ThreadMessageConstraints {
    /// Creates a new [`ThreadMessageConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Validation
    }
}

impl From<ThreadMessageConstraints> for String {
    #[inline]
    fn from(val: ThreadMessageConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ThreadMessageConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

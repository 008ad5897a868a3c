//! Message threads table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Message threads table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum MessageThreadConstraints {
    #[strum(serialize = "message_threads_subject_length")]
    SubjectLength,
}

impl MessageThreadConstraints {
    /// Creates a new [`MessageThreadConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Validation
    }
}

impl From<MessageThreadConstraints> for String {
    #[inline]
    fn from(val: MessageThreadConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for MessageThreadConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

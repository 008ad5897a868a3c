//! Direct messages table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Direct messages table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum MessageConstraints {
    // Messages validation constraints
    #[strum(serialize = "messages_body_length")]
    BodyLength,

    // Messages business logic constraints
    #[strum(serialize = "messages_read_has_timestamp")]
    ReadHasTimestamp,
    #[strum(serialize = "messages_not_self")]
    NotSelf,
}

impl MessageConstraints {
    /// Creates a new [`MessageConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            MessageConstraints::BodyLength => ConstraintCategory::Validation,
            MessageConstraints::ReadHasTimestamp
            | MessageConstraints::NotSelf => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<MessageConstraints> for String {
    #[inline]
    fn from(val: MessageConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for MessageConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

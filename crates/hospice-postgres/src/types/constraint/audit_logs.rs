//! Audit logs table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Audit logs table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AuditLogConstraints {
    #[strum(serialize = "audit_logs_action_not_empty")]
    ActionNotEmpty,
    #[strum(serialize = "audit_logs_metadata_object")]
    MetadataObject,
}

impl AuditLogConstraints {
    /// Creates a new [`AuditLogConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        ConstraintCategory::Validation
    }
}

impl From<AuditLogConstraints> for String {
    #[inline]
    fn from(val: AuditLogConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AuditLogConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

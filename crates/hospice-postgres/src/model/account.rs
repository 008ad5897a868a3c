//! Account model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::accounts;
use crate::types::{AccountRole, OnboardingStep};

/// Global identity of a person using the portal.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: Uuid,
    /// Lowercased email address, unique among live accounts.
    pub email: String,
    /// Argon2 PHC string, absent until the account sets a password.
    pub password_hash: Option<String>,
    pub display_name: String,
    pub role: AccountRole,
    pub onboarding_step: OnboardingStep,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating an account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    pub email: String,
    pub password_hash: Option<String>,
    pub display_name: String,
    pub role: AccountRole,
    pub onboarding_step: OnboardingStep,
}

/// Partial account update.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAccount {
    pub password_hash: Option<Option<String>>,
    pub display_name: Option<String>,
    pub role: Option<AccountRole>,
    pub onboarding_step: Option<OnboardingStep>,
    pub deleted_at: Option<Option<Timestamp>>,
}

impl Account {
    /// Returns whether the account has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns whether the account has chosen a password.
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Returns whether the account may sign in and act.
    pub fn is_active(&self) -> bool {
        !self.is_deleted()
    }
}

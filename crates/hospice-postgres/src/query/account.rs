//! Account repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Account, NewAccount, UpdateAccount};
use crate::types::AccountRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for account records.
///
/// Lookups ignore soft-deleted accounts unless stated otherwise.
pub trait AccountRepository {
    /// Creates an account.
    fn create_account(
        &mut self,
        account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Finds a live account by id.
    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds a live account by email, compared case-insensitively.
    fn find_account_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Applies a partial update.
    fn update_account(
        &mut self,
        account_id: Uuid,
        changes: UpdateAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Returns whether any live account has the given role.
    fn role_exists(&mut self, role: AccountRole) -> impl Future<Output = PgResult<bool>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        let account = diesel::insert_into(accounts::table)
            .values(&account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(account)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::dsl::*;

        let account = accounts
            .filter(id.eq(account_id))
            .filter(deleted_at.is_null())
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(account)
    }

    async fn find_account_by_email(&mut self, email_address: &str) -> PgResult<Option<Account>> {
        use schema::accounts::dsl::*;

        let account = accounts
            .filter(email.eq(email_address.trim().to_lowercase()))
            .filter(deleted_at.is_null())
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(account)
    }

    async fn update_account(
        &mut self,
        account_id: Uuid,
        changes: UpdateAccount,
    ) -> PgResult<Account> {
        use schema::accounts::dsl::*;

        let account = diesel::update(accounts)
            .filter(id.eq(account_id))
            .set(&changes)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(account)
    }

    async fn role_exists(&mut self, account_role: AccountRole) -> PgResult<bool> {
        use diesel::dsl::exists;
        use schema::accounts::dsl::*;

        let found = diesel::select(exists(
            accounts
                .filter(role.eq(account_role))
                .filter(deleted_at.is_null()),
        ))
        .get_result(self)
        .await
        .map_err(PgError::from)?;

        Ok(found)
    }
}

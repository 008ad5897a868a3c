use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::now;
use crate::model::{AccountSession, NewAccountSession};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for login sessions.
pub trait AccountSessionRepository {
    /// Records a newly issued session.
    fn create_session(
        &mut self,
        session: NewAccountSession,
    ) -> impl Future<Output = PgResult<AccountSession>> + Send;

    /// Finds a session by id, whether or not it is still valid.
    fn find_session_by_id(
        &mut self,
        session_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<AccountSession>>> + Send;

    /// Revokes one session. Revoking twice keeps the first timestamp.
    fn revoke_session(&mut self, session_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;

    /// Revokes every live session of an account and returns how many changed.
    fn revoke_account_sessions(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl AccountSessionRepository for PgConnection {
    async fn create_session(&mut self, session: NewAccountSession) -> PgResult<AccountSession> {
        use schema::account_sessions;

        diesel::insert_into(account_sessions::table)
            .values(&session)
            .returning(AccountSession::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_session_by_id(&mut self, session_id: Uuid) -> PgResult<Option<AccountSession>> {
        use schema::account_sessions::dsl::*;

        account_sessions
            .filter(id.eq(session_id))
            .select(AccountSession::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn revoke_session(&mut self, session_id: Uuid) -> PgResult<()> {
        use schema::account_sessions::dsl::*;

        diesel::update(account_sessions)
            .filter(id.eq(session_id))
            .filter(revoked_at.is_null())
            .set(revoked_at.eq(Some(now())))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }

    async fn revoke_account_sessions(&mut self, owner_id: Uuid) -> PgResult<usize> {
        use schema::account_sessions::dsl::*;

        diesel::update(account_sessions)
            .filter(account_id.eq(owner_id))
            .filter(revoked_at.is_null())
            .set(revoked_at.eq(Some(now())))
            .execute(self)
            .await
            .map_err(PgError::from)
    }
}

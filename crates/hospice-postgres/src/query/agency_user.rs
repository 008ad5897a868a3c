use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Account, AgencyUser, NewAgencyUser, UpdateAgencyUser};
use crate::types::AgencyRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for agency memberships.
pub trait AgencyUserRepository {
    /// Adds an account to an agency.
    ///
    /// Fails with a unique violation when the account already belongs to an
    /// agency.
    fn add_agency_member(
        &mut self,
        member: NewAgencyUser,
    ) -> impl Future<Output = PgResult<AgencyUser>> + Send;

    /// Finds the single membership of an account.
    fn find_membership(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<AgencyUser>>> + Send;

    /// Finds a member of a specific agency.
    fn find_agency_member(
        &mut self,
        agency_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<AgencyUser>>> + Send;

    /// Lists members with their accounts, admins first then by join date.
    fn list_agency_members(
        &mut self,
        agency_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<(AgencyUser, Account)>>> + Send;

    fn update_agency_member(
        &mut self,
        agency_id: Uuid,
        account_id: Uuid,
        changes: UpdateAgencyUser,
    ) -> impl Future<Output = PgResult<AgencyUser>> + Send;

    /// Removes a member and returns whether a row was deleted.
    fn remove_agency_member(
        &mut self,
        agency_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Returns the account ids holding `role` in the agency and locks their
    /// rows until the surrounding transaction ends.
    fn lock_agency_members_by_role(
        &mut self,
        agency_id: Uuid,
        role: AgencyRole,
    ) -> impl Future<Output = PgResult<Vec<Uuid>>> + Send;
}

impl AgencyUserRepository for PgConnection {
    async fn add_agency_member(&mut self, member: NewAgencyUser) -> PgResult<AgencyUser> {
        use schema::agency_users;

        diesel::insert_into(agency_users::table)
            .values(&member)
            .returning(AgencyUser::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_membership(&mut self, member_id: Uuid) -> PgResult<Option<AgencyUser>> {
        use schema::agency_users::dsl::*;

        agency_users
            .filter(account_id.eq(member_id))
            .select(AgencyUser::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_agency_member(
        &mut self,
        agency: Uuid,
        member_id: Uuid,
    ) -> PgResult<Option<AgencyUser>> {
        use schema::agency_users::dsl::*;

        agency_users
            .filter(agency_id.eq(agency))
            .filter(account_id.eq(member_id))
            .select(AgencyUser::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_agency_members(&mut self, agency: Uuid) -> PgResult<Vec<(AgencyUser, Account)>> {
        use schema::{accounts, agency_users};

        agency_users::table
            .inner_join(accounts::table)
            .filter(agency_users::agency_id.eq(agency))
            .filter(accounts::deleted_at.is_null())
            .select((AgencyUser::as_select(), Account::as_select()))
            .order((agency_users::role.asc(), agency_users::created_at.asc()))
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_agency_member(
        &mut self,
        agency: Uuid,
        member_id: Uuid,
        changes: UpdateAgencyUser,
    ) -> PgResult<AgencyUser> {
        use schema::agency_users::dsl::*;

        diesel::update(agency_users)
            .filter(agency_id.eq(agency))
            .filter(account_id.eq(member_id))
            .set(&changes)
            .returning(AgencyUser::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn remove_agency_member(&mut self, agency: Uuid, member_id: Uuid) -> PgResult<bool> {
        use schema::agency_users::dsl::*;

        let deleted = diesel::delete(agency_users)
            .filter(agency_id.eq(agency))
            .filter(account_id.eq(member_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn lock_agency_members_by_role(
        &mut self,
        agency: Uuid,
        member_role: AgencyRole,
    ) -> PgResult<Vec<Uuid>> {
        use schema::agency_users::dsl::*;

        agency_users
            .filter(agency_id.eq(agency))
            .filter(role.eq(member_role))
            .select(account_id)
            .for_update()
            .load(self)
            .await
            .map_err(PgError::from)
    }
}

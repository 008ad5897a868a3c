use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Agency, NewAgency, UpdateAgency};
use crate::types::{CursorPage, CursorPagination};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for agencies.
pub trait AgencyRepository {
    fn create_agency(&mut self, agency: NewAgency)
    -> impl Future<Output = PgResult<Agency>> + Send;

    fn find_agency_by_id(
        &mut self,
        agency_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Agency>>> + Send;

    fn update_agency(
        &mut self,
        agency_id: Uuid,
        changes: UpdateAgency,
    ) -> impl Future<Output = PgResult<Agency>> + Send;

    /// Returns whether the slug is already taken.
    fn agency_slug_exists(&mut self, slug: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists every agency on the platform.
    fn list_agencies(
        &mut self,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<Agency>>> + Send;
}

impl AgencyRepository for PgConnection {
    async fn create_agency(&mut self, agency: NewAgency) -> PgResult<Agency> {
        use schema::agencies;

        diesel::insert_into(agencies::table)
            .values(&agency)
            .returning(Agency::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_agency_by_id(&mut self, agency_id: Uuid) -> PgResult<Option<Agency>> {
        use schema::agencies::dsl::*;

        agencies
            .filter(id.eq(agency_id))
            .select(Agency::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_agency(&mut self, agency_id: Uuid, changes: UpdateAgency) -> PgResult<Agency> {
        use schema::agencies::dsl::*;

        diesel::update(agencies)
            .filter(id.eq(agency_id))
            .set(&changes)
            .returning(Agency::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn agency_slug_exists(&mut self, agency_slug: &str) -> PgResult<bool> {
        use diesel::dsl::exists;
        use schema::agencies::dsl::*;

        diesel::select(exists(agencies.filter(slug.eq(agency_slug))))
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_agencies(&mut self, pagination: CursorPagination) -> PgResult<CursorPage<Agency>> {
        use schema::agencies::dsl::*;

        let mut query = agencies.into_boxed();
        if let Some(cursor) = pagination.after {
            let cursor_ts = jiff_diesel::Timestamp::from(cursor.timestamp);
            query = query.filter(
                created_at
                    .lt(cursor_ts)
                    .or(created_at.eq(cursor_ts).and(id.lt(cursor.id))),
            );
        }

        let items = query
            .select(Agency::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |agency| {
            (agency.created_at.into(), agency.id)
        }))
    }
}

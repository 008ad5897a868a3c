use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewVisit, UpdateVisit, Visit};
use crate::types::{CursorPage, CursorPagination, VisitStatus};
use crate::{PgConnection, PgError, PgResult, schema};

/// Narrows a visit listing.
#[derive(Debug, Clone, Default)]
pub struct VisitFilter {
    pub agency_id: Option<Uuid>,
    /// Only visits of these patients; an empty list matches nothing.
    pub patient_ids: Option<Vec<Uuid>>,
    pub status: Option<VisitStatus>,
}

/// Repository for scheduled visits.
pub trait VisitRepository {
    fn create_visit(&mut self, visit: NewVisit) -> impl Future<Output = PgResult<Visit>> + Send;

    fn find_visit_by_id(
        &mut self,
        visit_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Visit>>> + Send;

    fn update_visit(
        &mut self,
        visit_id: Uuid,
        changes: UpdateVisit,
    ) -> impl Future<Output = PgResult<Visit>> + Send;

    /// Lists visits by schedule time, latest first.
    fn list_visits(
        &mut self,
        filter: VisitFilter,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<Visit>>> + Send;
}

impl VisitRepository for PgConnection {
    async fn create_visit(&mut self, visit: NewVisit) -> PgResult<Visit> {
        use schema::visits;

        diesel::insert_into(visits::table)
            .values(&visit)
            .returning(Visit::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_visit_by_id(&mut self, visit_id: Uuid) -> PgResult<Option<Visit>> {
        use schema::visits::dsl::*;

        visits
            .filter(id.eq(visit_id))
            .select(Visit::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_visit(&mut self, visit_id: Uuid, changes: UpdateVisit) -> PgResult<Visit> {
        use schema::visits::dsl::*;

        diesel::update(visits)
            .filter(id.eq(visit_id))
            .set(&changes)
            .returning(Visit::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_visits(
        &mut self,
        filter: VisitFilter,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<Visit>> {
        use schema::visits::dsl::*;

        let mut query = visits.into_boxed();
        if let Some(agency) = filter.agency_id {
            query = query.filter(agency_id.eq(agency));
        }
        if let Some(patients) = filter.patient_ids {
            query = query.filter(patient_id.eq_any(patients));
        }
        if let Some(visit_status) = filter.status {
            query = query.filter(status.eq(visit_status));
        }

        if let Some(cursor) = pagination.after {
            let cursor_ts = jiff_diesel::Timestamp::from(cursor.timestamp);
            query = query.filter(
                scheduled_at
                    .lt(cursor_ts)
                    .or(scheduled_at.eq(cursor_ts).and(id.lt(cursor.id))),
            );
        }

        let items = query
            .select(Visit::as_select())
            .order((scheduled_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |visit| {
            (visit.scheduled_at.into(), visit.id)
        }))
    }
}

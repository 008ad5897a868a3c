use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewSupplyRequest, SupplyRequest};
use crate::types::{CursorPage, CursorPagination, SupplyRequestStatus};
use crate::{PgConnection, PgError, PgResult, schema};

/// Narrows a supply request listing.
#[derive(Debug, Clone, Default)]
pub struct SupplyRequestFilter {
    pub agency_id: Option<Uuid>,
    pub patient_ids: Option<Vec<Uuid>>,
    pub status: Option<SupplyRequestStatus>,
}

/// Repository for family supply requests.
pub trait SupplyRequestRepository {
    fn create_supply_request(
        &mut self,
        request: NewSupplyRequest,
    ) -> impl Future<Output = PgResult<SupplyRequest>> + Send;

    fn find_supply_request_by_id(
        &mut self,
        request_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<SupplyRequest>>> + Send;

    /// Moves a request from `from` to `to`.
    ///
    /// Returns `None` when the request is no longer in `from`.
    fn update_supply_request_status(
        &mut self,
        request_id: Uuid,
        from: SupplyRequestStatus,
        to: SupplyRequestStatus,
    ) -> impl Future<Output = PgResult<Option<SupplyRequest>>> + Send;

    fn list_supply_requests(
        &mut self,
        filter: SupplyRequestFilter,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<SupplyRequest>>> + Send;
}

impl SupplyRequestRepository for PgConnection {
    async fn create_supply_request(&mut self, request: NewSupplyRequest) -> PgResult<SupplyRequest> {
        use schema::supply_requests;

        diesel::insert_into(supply_requests::table)
            .values(&request)
            .returning(SupplyRequest::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_supply_request_by_id(
        &mut self,
        request_id: Uuid,
    ) -> PgResult<Option<SupplyRequest>> {
        use schema::supply_requests::dsl::*;

        supply_requests
            .filter(id.eq(request_id))
            .select(SupplyRequest::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_supply_request_status(
        &mut self,
        request_id: Uuid,
        from: SupplyRequestStatus,
        to: SupplyRequestStatus,
    ) -> PgResult<Option<SupplyRequest>> {
        use schema::supply_requests::dsl::*;

        diesel::update(supply_requests)
            .filter(id.eq(request_id))
            .filter(status.eq(from))
            .set(status.eq(to))
            .returning(SupplyRequest::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_supply_requests(
        &mut self,
        filter: SupplyRequestFilter,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<SupplyRequest>> {
        use schema::supply_requests::dsl::*;

        let mut query = supply_requests.into_boxed();
        if let Some(agency) = filter.agency_id {
            query = query.filter(agency_id.eq(agency));
        }
        if let Some(patients) = filter.patient_ids {
            query = query.filter(patient_id.eq_any(patients));
        }
        if let Some(request_status) = filter.status {
            query = query.filter(status.eq(request_status));
        }

        if let Some(cursor) = pagination.after {
            let cursor_ts = jiff_diesel::Timestamp::from(cursor.timestamp);
            query = query.filter(
                created_at
                    .lt(cursor_ts)
                    .or(created_at.eq(cursor_ts).and(id.lt(cursor.id))),
            );
        }

        let items = query
            .select(SupplyRequest::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |request| {
            (request.created_at.into(), request.id)
        }))
    }
}

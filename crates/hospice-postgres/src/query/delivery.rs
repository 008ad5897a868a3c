use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Delivery, NewDelivery, UpdateDelivery};
use crate::types::{CursorPage, CursorPagination, DeliveryStatus};
use crate::{PgConnection, PgError, PgResult, schema};

/// Narrows a delivery listing.
#[derive(Debug, Clone, Default)]
pub struct DeliveryFilter {
    pub agency_id: Option<Uuid>,
    pub patient_ids: Option<Vec<Uuid>>,
    pub status: Option<DeliveryStatus>,
}

/// Repository for tracked deliveries.
pub trait DeliveryRepository {
    fn create_delivery(
        &mut self,
        delivery: NewDelivery,
    ) -> impl Future<Output = PgResult<Delivery>> + Send;

    fn find_delivery_by_id(
        &mut self,
        delivery_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Delivery>>> + Send;

    fn update_delivery(
        &mut self,
        delivery_id: Uuid,
        changes: UpdateDelivery,
    ) -> impl Future<Output = PgResult<Delivery>> + Send;

    fn list_deliveries(
        &mut self,
        filter: DeliveryFilter,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<Delivery>>> + Send;
}

impl DeliveryRepository for PgConnection {
    async fn create_delivery(&mut self, delivery: NewDelivery) -> PgResult<Delivery> {
        use schema::deliveries;

        diesel::insert_into(deliveries::table)
            .values(&delivery)
            .returning(Delivery::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_delivery_by_id(&mut self, delivery_id: Uuid) -> PgResult<Option<Delivery>> {
        use schema::deliveries::dsl::*;

        deliveries
            .filter(id.eq(delivery_id))
            .select(Delivery::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_delivery(
        &mut self,
        delivery_id: Uuid,
        changes: UpdateDelivery,
    ) -> PgResult<Delivery> {
        use schema::deliveries::dsl::*;

        diesel::update(deliveries)
            .filter(id.eq(delivery_id))
            .set(&changes)
            .returning(Delivery::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_deliveries(
        &mut self,
        filter: DeliveryFilter,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<Delivery>> {
        use schema::deliveries::dsl::*;

        let mut query = deliveries.into_boxed();
        if let Some(agency) = filter.agency_id {
            query = query.filter(agency_id.eq(agency));
        }
        if let Some(patients) = filter.patient_ids {
            query = query.filter(patient_id.eq_any(patients));
        }
        if let Some(delivery_status) = filter.status {
            query = query.filter(status.eq(delivery_status));
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
            .select(Delivery::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |delivery| {
            (delivery.created_at.into(), delivery.id)
        }))
    }
}

//! Delivery handlers with tracking registration.
//!
//! Creating a delivery resolves the free-text item against the supply
//! catalog, stores the delivery with an audit entry, then registers the
//! shipment with the tracking service when a carrier and tracking number
//! are known. Registration failures never fail the request.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hospice_postgres::model::{Delivery as DeliveryModel, NewAuditLog, Patient, UpdateDelivery};
use hospice_postgres::query::{
    AuditLogRepository, DeliveryFilter, DeliveryRepository, SupplyRequestRepository,
};
use hospice_postgres::types::NotificationEvent;
use hospice_postgres::{PgClient, PgConn};
use hospice_relay::TrackingClient;
use validator::Validate;

use crate::extract::{
    AuthHeader, AuthProvider, AuthState, Json, Path, Permission, PgPool, Query, ValidateJson,
};
use crate::handler::request::{
    CreateDelivery, CursorQuery, DeliveryListFilter, DeliveryPathParams,
    UpdateDelivery as UpdateDeliveryRequest,
};
use crate::handler::response::{Delivery, ErrorResponse, Page};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{
    FamilyNotice, ServiceState, SupplyCatalog, notify_family, register_tracking,
};

/// Tracing target for delivery operations.
const TRACING_TARGET: &str = "hospice_server::handler::deliveries";

fn delivery_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("Delivery not found")
        .with_resource("delivery")
}

/// Registers the shipment and stores the outcome.
///
/// Returns the delivery as stored afterwards.
async fn track(
    conn: &mut PgConn,
    tracking: &TrackingClient,
    delivery: DeliveryModel,
) -> Result<DeliveryModel> {
    if delivery.tracking().is_none() || !register_tracking(tracking, &delivery).await {
        return Ok(delivery);
    }

    let changes = UpdateDelivery {
        tracking_registered: Some(true),
        ..Default::default()
    };
    Ok(conn.update_delivery(delivery.id, changes).await?)
}

fn delivery_notice(delivery: &DeliveryModel) -> FamilyNotice {
    FamilyNotice::new(NotificationEvent::DeliveryUpdated)
        .with_body(format!("Delivery status: {}", delivery.status))
        .with_payload(serde_json::json!({
            "deliveryId": delivery.id,
            "itemKey": delivery.item_key,
            "status": delivery.status,
            "carrier": delivery.carrier,
            "trackingNumber": delivery.tracking_number,
        }))
}

/// Tells the family about the delivery. Failures are logged.
async fn notify_delivery(conn: &mut PgConn, patient: &Patient, delivery: &DeliveryModel) {
    if let Err(error) = notify_family(conn, patient, delivery_notice(delivery)).await {
        tracing::warn!(
            target: TRACING_TARGET,
            delivery_id = %delivery.id,
            error = %error,
            "failed to notify family about delivery"
        );
    }
}

/// Records a delivery and registers its shipment.
#[tracing::instrument(skip_all, fields(account_id = %auth_claims.account_id))]
async fn create_delivery(
    State(pg_client): State<PgClient>,
    State(catalog): State<SupplyCatalog>,
    State(tracking): State<TrackingClient>,
    AuthHeader(auth_claims): AuthHeader,
    ValidateJson(request): ValidateJson<CreateDelivery>,
) -> Result<(StatusCode, Json<Delivery>)> {
    let refs = request.refs()?;
    let item = catalog.resolve(&request.item_key)?;

    let mut conn = pg_client.get_connection().await?;
    let AuthState(auth_state) = AuthState::verify(&mut conn, auth_claims).await?;

    let patient = auth_state
        .authorize_patient(&mut conn, refs.patient_id, Permission::ManageDeliveries)
        .await?;

    if let Some(request_id) = refs.supply_request_id {
        let supply_request = conn.find_supply_request_by_id(request_id).await?;
        if supply_request.is_none_or(|supply_request| supply_request.patient_id != patient.id) {
            return Err(ErrorKind::NotFound
                .with_message("Supply request not found for this patient")
                .with_resource("supplyRequestId"));
        }
    }

    let new_delivery = request.into_model(patient.agency_id, refs, item.key, auth_state.account_id);
    let actor_id = auth_state.account_id;

    let delivery = conn
        .transaction(|conn| {
            Box::pin(async move {
                let delivery = conn.create_delivery(new_delivery).await?;
                conn.create_audit_log(
                    NewAuditLog::new("delivery.create", "delivery")
                        .agency(delivery.agency_id)
                        .actor(actor_id)
                        .target(delivery.id)
                        .metadata(serde_json::json!({
                            "itemKey": delivery.item_key,
                            "patientId": delivery.patient_id,
                        })),
                )
                .await?;
                Ok::<_, Error<'static>>(delivery)
            })
        })
        .await?;

    let delivery = track(&mut conn, &tracking, delivery).await?;
    notify_delivery(&mut conn, &patient, &delivery).await;

    tracing::info!(
        target: TRACING_TARGET,
        delivery_id = %delivery.id,
        item_key = %delivery.item_key,
        tracking_registered = delivery.tracking_registered,
        "delivery created"
    );

    Ok((StatusCode::CREATED, Json(delivery.into())))
}

fn create_delivery_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create delivery")
        .description(
            "Records a delivery for the patient. The item is matched against the supply catalog \
             and malformed ids are rejected with the field name. With a carrier and tracking \
             number the shipment is registered for tracking; `trackingRegistered` reports \
             whether that worked. The family is notified.",
        )
        .response::<201, Json<Delivery>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists deliveries the caller may see.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_deliveries(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(query): Query<CursorQuery>,
    Query(filter): Query<DeliveryListFilter>,
) -> Result<(StatusCode, Json<Page<Delivery>>)> {
    query.validate()?;
    let patient_id = filter.patient_id()?;

    let scope = auth_state
        .list_filter(&mut conn, patient_id, Permission::ViewDeliveries)
        .await?;
    let filter = DeliveryFilter {
        agency_id: scope.agency_id,
        patient_ids: scope.patient_ids,
        status: filter.status,
    };

    let page = conn.list_deliveries(filter, query.into_pagination()?).await?;
    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, Delivery::from))))
}

fn list_deliveries_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List deliveries")
        .description("Lists deliveries newest first, optionally for one patient or status.")
        .response::<200, Json<Page<Delivery>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns a delivery.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, delivery_id = %path_params.delivery_id))]
async fn read_delivery(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<DeliveryPathParams>,
) -> Result<(StatusCode, Json<Delivery>)> {
    let delivery = conn
        .find_delivery_by_id(path_params.delivery_id)
        .await?
        .ok_or_else(delivery_not_found)?;

    auth_state
        .authorize_patient(&mut conn, delivery.patient_id, Permission::ViewDeliveries)
        .await?;

    Ok((StatusCode::OK, Json(delivery.into())))
}

fn read_delivery_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get delivery")
        .response::<200, Json<Delivery>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates status or tracking details of a delivery.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, delivery_id = %path_params.delivery_id))]
async fn update_delivery(
    PgPool(mut conn): PgPool,
    State(tracking): State<TrackingClient>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<DeliveryPathParams>,
    ValidateJson(request): ValidateJson<UpdateDeliveryRequest>,
) -> Result<(StatusCode, Json<Delivery>)> {
    if request.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("The request changes nothing")
            .with_resource("delivery"));
    }

    let current = conn
        .find_delivery_by_id(path_params.delivery_id)
        .await?
        .ok_or_else(delivery_not_found)?;
    let patient = auth_state
        .authorize_patient(&mut conn, current.patient_id, Permission::ManageDeliveries)
        .await?;

    let retrack = request.changes_tracking(&current);
    let changes = request.into_model(&current)?;

    let mut delivery = conn.update_delivery(current.id, changes).await?;
    if retrack {
        delivery = track(&mut conn, &tracking, delivery).await?;
    }
    if delivery.status != current.status {
        notify_delivery(&mut conn, &patient, &delivery).await;
    }

    tracing::info!(
        target: TRACING_TARGET,
        status = %delivery.status,
        retracked = retrack,
        tracking_registered = delivery.tracking_registered,
        "delivery updated"
    );

    Ok((StatusCode::OK, Json(delivery.into())))
}

fn update_delivery_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update delivery")
        .description(
            "Updates the delivery. A new carrier or tracking number registers the shipment \
             again. Moving to `delivered` without `deliveredAt` stamps the arrival now. Status \
             changes notify the family.",
        )
        .response::<200, Json<Delivery>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for deliveries.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/deliveries",
            post_with(create_delivery, create_delivery_docs)
                .get_with(list_deliveries, list_deliveries_docs),
        )
        .api_route(
            "/deliveries/{deliveryId}",
            get_with(read_delivery, read_delivery_docs)
                .patch_with(update_delivery, update_delivery_docs),
        )
        .with_path_items(|item| item.tag("Deliveries"))
}

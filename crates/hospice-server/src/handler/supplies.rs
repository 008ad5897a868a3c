//! Supply catalog and family supply request handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hospice_postgres::model::SupplyRequest as SupplyRequestModel;
use hospice_postgres::query::{SupplyRequestFilter, SupplyRequestRepository};
use hospice_postgres::types::{NotificationEvent, SupplyRequestStatus};
use validator::Validate;

use crate::extract::{
    AuthProvider, AuthState, Json, Path, Permission, PgPool, Query, ValidateJson,
};
use crate::handler::request::{
    CreateSupplyRequest, CursorQuery, SupplyRequestListFilter, SupplyRequestPathParams,
    UpdateSupplyRequest,
};
use crate::handler::response::{CatalogItem, ErrorResponse, Page, SupplyRequest};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{FamilyNotice, ServiceState, SupplyCatalog, notify_family};

/// Tracing target for supply operations.
const TRACING_TARGET: &str = "hospice_server::handler::supplies";

/// Whether the caller may move `request` to `next` through its family link.
///
/// Family members may only cancel pending requests they made themselves.
fn is_own_cancellation(
    auth_state: &impl AuthProvider,
    request: &SupplyRequestModel,
    next: SupplyRequestStatus,
) -> bool {
    auth_state.role().is_family()
        && request.status == SupplyRequestStatus::Pending
        && next == SupplyRequestStatus::Cancelled
        && request.requested_by == auth_state.account_id()
}

/// Permission required to move `request` to `next`.
fn status_change_permission(
    auth_state: &impl AuthProvider,
    request: &SupplyRequestModel,
    next: SupplyRequestStatus,
) -> Permission {
    if is_own_cancellation(auth_state, request, next) {
        Permission::CreateSupplyRequests
    } else {
        Permission::ManageSupplyRequests
    }
}

fn transition_conflict(current: SupplyRequestStatus, next: SupplyRequestStatus) -> Error<'static> {
    ErrorKind::Conflict
        .with_message(format!("A {current} supply request cannot become {next}"))
        .with_resource("supply_request")
}

/// Returns the supply catalog.
#[tracing::instrument(skip_all)]
async fn list_catalog(
    State(catalog): State<SupplyCatalog>,
) -> Result<(StatusCode, Json<Vec<CatalogItem>>)> {
    let items = catalog.items().iter().map(CatalogItem::from).collect();
    Ok((StatusCode::OK, Json(items)))
}

fn list_catalog_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Supply catalog")
        .description("Lists the items that can be requested and delivered, with accepted aliases.")
        .response::<200, Json<Vec<CatalogItem>>>()
}

/// Asks the agency for a catalog item.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, patient_id = %request.patient_id))]
async fn create_supply_request(
    PgPool(mut conn): PgPool,
    State(catalog): State<SupplyCatalog>,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateSupplyRequest>,
) -> Result<(StatusCode, Json<SupplyRequest>)> {
    let item = catalog.resolve(&request.item_key)?;

    let patient = auth_state
        .authorize_patient(&mut conn, request.patient_id, Permission::CreateSupplyRequests)
        .await?;

    let new_request = request.into_model(patient.agency_id, auth_state.account_id, item);
    let supply_request = conn.create_supply_request(new_request).await?;

    tracing::info!(
        target: TRACING_TARGET,
        request_id = %supply_request.id,
        item_key = %supply_request.item_key,
        quantity = supply_request.quantity,
        "supply request created"
    );

    Ok((StatusCode::CREATED, Json(supply_request.into())))
}

fn create_supply_request_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create supply request")
        .description(
            "Requests a catalog item for the patient. The item may be named by key, by name or \
             by alias, with size suffixes such as `- Large` ignored.",
        )
        .response::<201, Json<SupplyRequest>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists supply requests the caller may see.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_supply_requests(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Query(query): Query<CursorQuery>,
    Query(filter): Query<SupplyRequestListFilter>,
) -> Result<(StatusCode, Json<Page<SupplyRequest>>)> {
    query.validate()?;

    let scope = auth_state
        .list_filter(&mut conn, filter.patient_id, Permission::ViewSupplyRequests)
        .await?;
    let filter = SupplyRequestFilter {
        agency_id: scope.agency_id,
        patient_ids: scope.patient_ids,
        status: filter.status,
    };

    let page = conn
        .list_supply_requests(filter, query.into_pagination()?)
        .await?;

    Ok((StatusCode::OK, Json(Page::from_cursor_page(page, SupplyRequest::from))))
}

fn list_supply_requests_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List supply requests")
        .description("Lists supply requests newest first, optionally for one patient or status.")
        .response::<200, Json<Page<SupplyRequest>>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Moves a supply request to a new status.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id, request_id = %path_params.request_id))]
async fn update_supply_request(
    PgPool(mut conn): PgPool,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<SupplyRequestPathParams>,
    ValidateJson(request): ValidateJson<UpdateSupplyRequest>,
) -> Result<(StatusCode, Json<SupplyRequest>)> {
    let supply_request = conn
        .find_supply_request_by_id(path_params.request_id)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message("Supply request not found")
                .with_resource("supply_request")
        })?;

    let permission = status_change_permission(&auth_state, &supply_request, request.status);
    let patient = auth_state
        .authorize_patient(&mut conn, supply_request.patient_id, permission)
        .await?;

    let current = supply_request.status;
    let next = request.status;
    if !current.can_transition_to(next) {
        return Err(transition_conflict(current, next));
    }

    let supply_request = conn
        .transaction(|conn| {
            Box::pin(async move {
                // A concurrent update that already moved the request loses here.
                let updated = conn
                    .update_supply_request_status(supply_request.id, current, next)
                    .await?
                    .ok_or_else(|| transition_conflict(current, next))?;

                if updated.status == SupplyRequestStatus::Fulfilled {
                    let notice = FamilyNotice::new(NotificationEvent::SupplyFulfilled)
                        .with_body(format!("{} x{}", updated.item_name, updated.quantity))
                        .with_payload(serde_json::json!({
                            "requestId": updated.id,
                            "itemKey": updated.item_key,
                        }));
                    notify_family(conn, &patient, notice).await?;
                }

                Ok::<_, Error<'static>>(updated)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        from = %current,
        to = %supply_request.status,
        "supply request updated"
    );

    Ok((StatusCode::OK, Json(supply_request.into())))
}

fn update_supply_request_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update supply request")
        .description(
            "Moves the request forward: pending to approved, fulfilled or cancelled, and \
             approved to fulfilled or cancelled. Family members may cancel their own pending \
             requests. A request changed concurrently answers 409. \
             Fulfilment notifies the family.",
        )
        .response::<200, Json<SupplyRequest>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns routes for supplies.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/supplies/catalog", get_with(list_catalog, list_catalog_docs))
        .api_route(
            "/supply-requests",
            post_with(create_supply_request, create_supply_request_docs)
                .get_with(list_supply_requests, list_supply_requests_docs),
        )
        .api_route(
            "/supply-requests/{requestId}",
            patch_with(update_supply_request, update_supply_request_docs),
        )
        .with_path_items(|item| item.tag("Supplies"))
}

#[cfg(test)]
mod tests {
    use hospice_postgres::types::AccountRole;
    use jiff::{Timestamp, ToSpan};
    use uuid::Uuid;

    use super::*;
    use crate::extract::AuthClaims;

    fn request_by(requested_by: Uuid, status: SupplyRequestStatus) -> SupplyRequestModel {
        let now = Timestamp::now();
        SupplyRequestModel {
            id: Uuid::new_v4(),
            agency_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            requested_by,
            item_key: "gloves".to_owned(),
            item_name: "Gloves".to_owned(),
            quantity: 1,
            notes: None,
            status,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn family() -> AuthClaims {
        AuthClaims::for_tests(AccountRole::Family, Timestamp::now() + 1.hour())
    }

    #[test]
    fn family_may_cancel_own_pending_request() {
        let caller = family();
        let request = request_by(caller.account_id, SupplyRequestStatus::Pending);

        assert_eq!(
            status_change_permission(&caller, &request, SupplyRequestStatus::Cancelled),
            Permission::CreateSupplyRequests
        );
    }

    #[test]
    fn family_cannot_cancel_approved_request() {
        let caller = family();
        let request = request_by(caller.account_id, SupplyRequestStatus::Approved);

        assert_eq!(
            status_change_permission(&caller, &request, SupplyRequestStatus::Cancelled),
            Permission::ManageSupplyRequests
        );
    }

    #[test]
    fn family_cannot_cancel_someone_elses_request() {
        let caller = family();
        let request = request_by(Uuid::new_v4(), SupplyRequestStatus::Pending);

        assert_eq!(
            status_change_permission(&caller, &request, SupplyRequestStatus::Cancelled),
            Permission::ManageSupplyRequests
        );
    }

    #[test]
    fn family_cannot_fulfil_own_request() {
        let caller = family();
        let request = request_by(caller.account_id, SupplyRequestStatus::Pending);

        assert_eq!(
            status_change_permission(&caller, &request, SupplyRequestStatus::Fulfilled),
            Permission::ManageSupplyRequests
        );
    }

    #[test]
    fn stale_transition_is_a_conflict() {
        let error = transition_conflict(SupplyRequestStatus::Fulfilled, SupplyRequestStatus::Fulfilled);
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }
}

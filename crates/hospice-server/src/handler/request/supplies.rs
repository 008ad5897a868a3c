//! Supply request types.

use hospice_postgres::model::NewSupplyRequest;
use hospice_postgres::types::SupplyRequestStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{OptionNormalized, not_blank};
use crate::service::CatalogItem;

/// Request payload to ask the agency for supplies.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplyRequest {
    /// Patient the supplies are for.
    pub patient_id: Uuid,

    /// Catalog key or free-text item name, e.g. `Gloves - Large`.
    #[validate(length(min = 1, max = 120))]
    #[validate(custom(function = "not_blank"))]
    pub item_key: String,

    /// Number of units (1-100).
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateSupplyRequest {
    pub fn into_model(
        self,
        agency_id: Uuid,
        requested_by: Uuid,
        item: &CatalogItem,
    ) -> NewSupplyRequest {
        NewSupplyRequest {
            agency_id,
            patient_id: self.patient_id,
            requested_by,
            item_key: item.key.to_owned(),
            item_name: item.name.to_owned(),
            quantity: self.quantity,
            notes: self.notes.trimmed_option(),
        }
    }
}

/// Request payload to move a supply request to a new status.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplyRequest {
    pub status: SupplyRequestStatus,
}

/// Filters for the supply request list.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRequestListFilter {
    /// Only requests for this patient.
    pub patient_id: Option<Uuid>,
    /// Only requests with this status.
    pub status: Option<SupplyRequestStatus>,
}

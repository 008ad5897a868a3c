//! Supply catalog and request response types.

use hospice_postgres::model;
use hospice_postgres::types::SupplyRequestStatus;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service;

/// One orderable catalog item.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Canonical item key.
    pub key: String,
    pub name: String,
    pub category: String,
    /// Other spellings that resolve to this key.
    pub aliases: Vec<String>,
}

impl From<&service::CatalogItem> for CatalogItem {
    fn from(item: &service::CatalogItem) -> Self {
        Self {
            key: item.key.to_owned(),
            name: item.name.to_owned(),
            category: item.category.to_owned(),
            aliases: item.aliases.iter().map(|alias| (*alias).to_owned()).collect(),
        }
    }
}

/// A supply request raised for a patient.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRequest {
    pub request_id: Uuid,
    pub agency_id: Uuid,
    pub patient_id: Uuid,
    pub requested_by: Uuid,
    pub item_key: String,
    pub item_name: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub status: SupplyRequestStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<model::SupplyRequest> for SupplyRequest {
    fn from(request: model::SupplyRequest) -> Self {
        Self {
            request_id: request.id,
            agency_id: request.agency_id,
            patient_id: request.patient_id,
            requested_by: request.requested_by,
            item_key: request.item_key,
            item_name: request.item_name,
            quantity: request.quantity,
            notes: request.notes,
            status: request.status,
            created_at: request.created_at.into(),
            updated_at: request.updated_at.into(),
        }
    }
}

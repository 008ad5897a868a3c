//! Patient response types.

use hospice_postgres::model;
use hospice_postgres::types::PatientStatus;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a patient.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub patient_id: Uuid,
    pub agency_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Medical record number.
    pub mrn: Option<String>,
    pub diagnosis: Option<String>,
    pub address: Option<String>,
    pub status: PatientStatus,
    pub admitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<model::Patient> for Patient {
    fn from(patient: model::Patient) -> Self {
        Self {
            patient_id: patient.id,
            agency_id: patient.agency_id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            mrn: patient.mrn,
            diagnosis: patient.diagnosis,
            address: patient.address,
            status: patient.status,
            admitted_at: patient.admitted_at.into(),
            created_at: patient.created_at.into(),
            updated_at: patient.updated_at.into(),
        }
    }
}

/// Family member linked to a patient.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub account_id: Uuid,
    pub patient_id: Uuid,
    pub full_name: String,
    pub relationship: Option<String>,
    pub linked_at: Timestamp,
}

impl From<model::FamilyMember> for FamilyMember {
    fn from(member: model::FamilyMember) -> Self {
        Self {
            account_id: member.account_id,
            patient_id: member.patient_id,
            full_name: member.full_name,
            relationship: member.relationship,
            linked_at: member.created_at.into(),
        }
    }
}

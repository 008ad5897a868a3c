//! Patient request types.

use hospice_postgres::model::{NewPatient, UpdatePatient as UpdatePatientModel};
use hospice_postgres::types::PatientStatus;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Normalized, OptionNormalized, not_blank};

/// Request payload to admit a patient.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatient {
    #[validate(length(min = 1, max = 100))]
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,

    /// Medical record number, unique within the agency.
    #[validate(length(min = 1, max = 64))]
    pub mrn: Option<String>,

    /// Primary hospice diagnosis.
    #[validate(length(max = 500))]
    pub diagnosis: Option<String>,

    /// Care address.
    #[validate(length(max = 500))]
    pub address: Option<String>,

    /// Admission time, now when omitted.
    pub admitted_at: Option<Timestamp>,
}

impl CreatePatient {
    pub fn into_model(self, agency_id: Uuid) -> NewPatient {
        NewPatient {
            agency_id,
            first_name: self.first_name.trimmed(),
            last_name: self.last_name.trimmed(),
            mrn: self.mrn.trimmed_option(),
            diagnosis: self.diagnosis.trimmed_option(),
            address: self.address.trimmed_option(),
            admitted_at: self.admitted_at.map(Into::into),
        }
    }
}

/// Request payload to update a patient record.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatient {
    #[validate(length(min = 1, max = 100))]
    #[validate(custom(function = "not_blank"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    #[validate(custom(function = "not_blank"))]
    pub last_name: Option<String>,

    /// Medical record number; an empty string clears it.
    #[validate(length(max = 64))]
    pub mrn: Option<String>,

    /// Diagnosis; an empty string clears it.
    #[validate(length(max = 500))]
    pub diagnosis: Option<String>,

    /// Address; an empty string clears it.
    #[validate(length(max = 500))]
    pub address: Option<String>,

    /// Care status, e.g. `discharged`.
    pub status: Option<PatientStatus>,
}

impl UpdatePatient {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.mrn.is_none()
            && self.diagnosis.is_none()
            && self.address.is_none()
            && self.status.is_none()
    }

    pub fn into_model(self) -> UpdatePatientModel {
        let clearable = |value: Option<String>| value.map(|v| Some(v).trimmed_option());

        UpdatePatientModel {
            first_name: self.first_name.map(|name| name.trimmed()),
            last_name: self.last_name.map(|name| name.trimmed()),
            mrn: clearable(self.mrn),
            diagnosis: clearable(self.diagnosis),
            address: clearable(self.address),
            status: self.status,
        }
    }
}

/// Filters for the agency patient list.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientFilter {
    /// Only patients with this status.
    pub status: Option<PatientStatus>,
}

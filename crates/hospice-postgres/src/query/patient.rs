use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewPatient, Patient, UpdatePatient};
use crate::types::{CursorPage, CursorPagination, PatientStatus};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for patient records.
pub trait PatientRepository {
    fn create_patient(
        &mut self,
        patient: NewPatient,
    ) -> impl Future<Output = PgResult<Patient>> + Send;

    fn find_patient_by_id(
        &mut self,
        patient_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Patient>>> + Send;

    fn update_patient(
        &mut self,
        patient_id: Uuid,
        changes: UpdatePatient,
    ) -> impl Future<Output = PgResult<Patient>> + Send;

    /// Lists patients of an agency, optionally narrowed to one status.
    fn list_agency_patients(
        &mut self,
        agency_id: Uuid,
        status: Option<PatientStatus>,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<Patient>>> + Send;

    /// Lists the patients a family account is linked to.
    fn list_family_patients(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Patient>>> + Send;
}

impl PatientRepository for PgConnection {
    async fn create_patient(&mut self, patient: NewPatient) -> PgResult<Patient> {
        use schema::patients;

        diesel::insert_into(patients::table)
            .values(&patient)
            .returning(Patient::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_patient_by_id(&mut self, patient_id: Uuid) -> PgResult<Option<Patient>> {
        use schema::patients::dsl::*;

        patients
            .filter(id.eq(patient_id))
            .select(Patient::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_patient(&mut self, patient_id: Uuid, changes: UpdatePatient) -> PgResult<Patient> {
        use schema::patients::dsl::*;

        diesel::update(patients)
            .filter(id.eq(patient_id))
            .set(&changes)
            .returning(Patient::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_agency_patients(
        &mut self,
        agency: Uuid,
        patient_status: Option<PatientStatus>,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<Patient>> {
        use schema::patients::dsl::*;

        let mut query = patients.filter(agency_id.eq(agency)).into_boxed();
        if let Some(patient_status) = patient_status {
            query = query.filter(status.eq(patient_status));
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
            .select(Patient::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |patient| {
            (patient.created_at.into(), patient.id)
        }))
    }

    async fn list_family_patients(&mut self, member_id: Uuid) -> PgResult<Vec<Patient>> {
        use schema::{family_members, patients};

        family_members::table
            .inner_join(patients::table)
            .filter(family_members::account_id.eq(member_id))
            .select(Patient::as_select())
            .order(patients::created_at.desc())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{FamilyMember, NewFamilyMember};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for links between family accounts and patients.
pub trait FamilyMemberRepository {
    /// Links a family account to a patient.
    ///
    /// Linking the same account twice keeps the existing row.
    fn add_family_member(
        &mut self,
        member: NewFamilyMember,
    ) -> impl Future<Output = PgResult<FamilyMember>> + Send;

    fn find_family_link(
        &mut self,
        patient_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<FamilyMember>>> + Send;

    fn list_patient_family(
        &mut self,
        patient_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<FamilyMember>>> + Send;

    /// Returns the patient ids a family account follows.
    fn list_family_patient_ids(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Uuid>>> + Send;
}

impl FamilyMemberRepository for PgConnection {
    async fn add_family_member(&mut self, member: NewFamilyMember) -> PgResult<FamilyMember> {
        use schema::family_members::dsl::*;

        let inserted = diesel::insert_into(family_members)
            .values(&member)
            .on_conflict((patient_id, account_id))
            .do_nothing()
            .returning(FamilyMember::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        match inserted {
            Some(link) => Ok(link),
            None => family_members
                .filter(patient_id.eq(member.patient_id))
                .filter(account_id.eq(member.account_id))
                .select(FamilyMember::as_select())
                .first(self)
                .await
                .map_err(PgError::from),
        }
    }

    async fn find_family_link(
        &mut self,
        patient: Uuid,
        member_id: Uuid,
    ) -> PgResult<Option<FamilyMember>> {
        use schema::family_members::dsl::*;

        family_members
            .filter(patient_id.eq(patient))
            .filter(account_id.eq(member_id))
            .select(FamilyMember::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_patient_family(&mut self, patient: Uuid) -> PgResult<Vec<FamilyMember>> {
        use schema::family_members::dsl::*;

        family_members
            .filter(patient_id.eq(patient))
            .select(FamilyMember::as_select())
            .order(created_at.asc())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_family_patient_ids(&mut self, member_id: Uuid) -> PgResult<Vec<Uuid>> {
        use schema::family_members::dsl::*;

        family_members
            .filter(account_id.eq(member_id))
            .select(patient_id)
            .load(self)
            .await
            .map_err(PgError::from)
    }
}

//! Authorization checks for authenticated callers.
//!
//! Super admins pass every check. Agency members are checked against their
//! [`AgencyRole`] in the agency that owns the resource. Family members are
//! checked through their link to a patient.
//!
//! [`AgencyRole`]: hospice_postgres::types::AgencyRole

use hospice_postgres::model::{AgencyUser, Patient};
use hospice_postgres::query::{AgencyUserRepository, FamilyMemberRepository, PatientRepository};
use hospice_postgres::types::AccountRole;
use hospice_postgres::{PgConn, PgResult};
use uuid::Uuid;

use super::{AuthResult, Permission, TRACING_TARGET_AUTHORIZATION};
use crate::handler::{ErrorKind, Result};

/// What a caller can see in list endpoints that are not scoped by a path.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessScope {
    /// Every agency.
    Platform,
    /// One agency, through a membership.
    Agency(AgencyUser),
    /// The patients a family account is linked to.
    Family(Vec<Uuid>),
}

impl AccessScope {
    /// Agency filter for repository queries; `None` means unrestricted.
    pub fn agency_id(&self) -> Option<Uuid> {
        match self {
            Self::Agency(member) => Some(member.agency_id),
            Self::Platform | Self::Family(_) => None,
        }
    }

    /// Patient filter for repository queries; `None` means unrestricted.
    pub fn patient_ids(&self) -> Option<Vec<Uuid>> {
        match self {
            Self::Family(patient_ids) => Some(patient_ids.clone()),
            Self::Platform | Self::Agency(_) => None,
        }
    }
}

/// Row filter for list endpoints that span patients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    /// Only rows of this agency.
    pub agency_id: Option<Uuid>,
    /// Only rows of these patients; an empty list matches nothing.
    pub patient_ids: Option<Vec<Uuid>>,
}

impl From<AccessScope> for ListFilter {
    fn from(scope: AccessScope) -> Self {
        Self {
            agency_id: scope.agency_id(),
            patient_ids: scope.patient_ids(),
        }
    }
}

/// Authorization for types that identify an authenticated account.
pub trait AuthProvider {
    /// Returns the authenticated account id.
    fn account_id(&self) -> Uuid;

    /// Returns the account role the caller was verified with.
    fn role(&self) -> AccountRole;

    #[inline]
    fn is_super_admin(&self) -> bool {
        self.role().is_super_admin()
    }

    /// Checks `permission` in the agency `agency_id`.
    #[allow(async_fn_in_trait)]
    async fn check_agency_permission(
        &self,
        conn: &mut PgConn,
        agency_id: Uuid,
        permission: Permission,
    ) -> PgResult<AuthResult> {
        if self.is_super_admin() {
            return Ok(AuthResult::granted());
        }

        let member = conn.find_agency_member(agency_id, self.account_id()).await?;

        let Some(member) = member else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                account_id = %self.account_id(),
                agency_id = %agency_id,
                permission = %permission,
                "access denied: not an agency member"
            );

            return Ok(AuthResult::denied("You are not a member of this agency"));
        };

        if permission.is_permitted_by_role(member.role) {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                account_id = %self.account_id(),
                agency_id = %agency_id,
                permission = %permission,
                role = %member.role,
                "access granted"
            );

            Ok(AuthResult::granted_with_member(member))
        } else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                account_id = %self.account_id(),
                agency_id = %agency_id,
                permission = %permission,
                role = %member.role,
                "access denied: insufficient role"
            );

            Ok(AuthResult::denied(format!(
                "Agency role '{}' does not allow {permission}",
                member.role
            )))
        }
    }

    /// Checks `permission` on `patient`, through agency membership or a family link.
    #[allow(async_fn_in_trait)]
    async fn check_patient_permission(
        &self,
        conn: &mut PgConn,
        patient: &Patient,
        permission: Permission,
    ) -> PgResult<AuthResult> {
        if self.role().is_family() {
            let link = conn.find_family_link(patient.id, self.account_id()).await?;

            return Ok(match link {
                Some(_) if permission.is_permitted_for_family() => AuthResult::granted(),
                Some(_) => AuthResult::denied(format!("Family members cannot {permission}")),
                None => {
                    tracing::warn!(
                        target: TRACING_TARGET_AUTHORIZATION,
                        account_id = %self.account_id(),
                        patient_id = %patient.id,
                        "access denied: no family link"
                    );
                    AuthResult::denied("You are not linked to this patient")
                }
            });
        }

        self.check_agency_permission(conn, patient.agency_id, permission)
            .await
    }

    /// Requires `permission` in the agency and returns the caller's membership.
    ///
    /// The membership is `None` for super admins.
    #[allow(async_fn_in_trait)]
    async fn authorize_agency(
        &self,
        conn: &mut PgConn,
        agency_id: Uuid,
        permission: Permission,
    ) -> Result<Option<AgencyUser>> {
        self.check_agency_permission(conn, agency_id, permission)
            .await?
            .into_result()
    }

    /// Loads the patient and requires `permission` on it.
    ///
    /// Returns 404 when the patient does not exist.
    #[allow(async_fn_in_trait)]
    async fn authorize_patient(
        &self,
        conn: &mut PgConn,
        patient_id: Uuid,
        permission: Permission,
    ) -> Result<Patient> {
        let Some(patient) = conn.find_patient_by_id(patient_id).await? else {
            return Err(ErrorKind::NotFound
                .with_message("Patient not found")
                .with_resource("patient"));
        };

        self.check_patient_permission(conn, &patient, permission)
            .await?
            .into_result()?;

        Ok(patient)
    }

    /// Requires the platform super-admin role.
    fn authorize_super_admin(&self) -> Result<()> {
        if self.is_super_admin() {
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %self.account_id(),
            role = %self.role(),
            "access denied: super admin required"
        );

        AuthResult::denied("Super admin privileges required")
            .into_result()
            .map(|_| ())
    }

    /// Narrows a list to one authorized patient, or to the caller's scope.
    #[allow(async_fn_in_trait)]
    async fn list_filter(
        &self,
        conn: &mut PgConn,
        patient_id: Option<Uuid>,
        permission: Permission,
    ) -> Result<ListFilter> {
        match patient_id {
            Some(patient_id) => {
                let patient = self.authorize_patient(conn, patient_id, permission).await?;
                Ok(ListFilter {
                    agency_id: Some(patient.agency_id),
                    patient_ids: Some(vec![patient.id]),
                })
            }
            None => self.access_scope(conn).await.map(ListFilter::from),
        }
    }

    /// Resolves the rows the caller may list when no patient is named.
    #[allow(async_fn_in_trait)]
    async fn access_scope(&self, conn: &mut PgConn) -> Result<AccessScope> {
        if self.is_super_admin() {
            return Ok(AccessScope::Platform);
        }

        if self.role().is_family() {
            let patient_ids = conn.list_family_patient_ids(self.account_id()).await?;
            return Ok(AccessScope::Family(patient_ids));
        }

        match conn.find_membership(self.account_id()).await? {
            Some(member) => Ok(AccessScope::Agency(member)),
            None => Err(ErrorKind::Forbidden
                .with_message("Your account is not attached to an agency")
                .with_resource("agency")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Caller(AccountRole);

    impl AuthProvider for Caller {
        fn account_id(&self) -> Uuid {
            Uuid::nil()
        }

        fn role(&self) -> AccountRole {
            self.0
        }
    }

    #[test]
    fn only_super_admins_pass_platform_checks() {
        assert!(Caller(AccountRole::SuperAdmin).authorize_super_admin().is_ok());

        for role in [AccountRole::AgencyAdmin, AccountRole::Staff, AccountRole::Family] {
            let error = Caller(role).authorize_super_admin().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Forbidden);
        }
    }

    #[test]
    fn scope_filters() {
        let family = AccessScope::Family(vec![Uuid::nil()]);
        assert_eq!(family.agency_id(), None);
        assert_eq!(family.patient_ids(), Some(vec![Uuid::nil()]));

        assert_eq!(AccessScope::Platform.agency_id(), None);
        assert_eq!(AccessScope::Platform.patient_ids(), None);
        assert_eq!(ListFilter::from(AccessScope::Platform), ListFilter::default());
    }
}

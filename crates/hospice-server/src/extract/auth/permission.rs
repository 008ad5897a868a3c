//! Permissions and the result of checking one.

use std::borrow::Cow;

use hospice_postgres::model::AgencyUser;
use hospice_postgres::types::AgencyRole;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::handler::{ErrorKind, Result};

/// Agency- and patient-scoped operations a caller may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Permission {
    // Agency
    ViewAgency,
    ManageAgency,
    ViewMembers,
    ManageMembers,
    InviteTeam,
    InviteFamily,
    ViewDashboards,
    ViewAuditLogs,

    // Patients
    ViewPatients,
    ManagePatients,

    // Care
    ViewVisits,
    ManageVisits,
    ViewSupplyRequests,
    CreateSupplyRequests,
    ManageSupplyRequests,
    ViewDeliveries,
    ManageDeliveries,

    // Messaging
    ViewMessages,
    SendMessages,
}

impl Permission {
    /// Returns whether an agency member with `role` holds this permission.
    pub const fn is_permitted_by_role(self, role: AgencyRole) -> bool {
        match role {
            AgencyRole::Admin => true,
            AgencyRole::Staff => !self.is_admin_only(),
        }
    }

    /// Returns whether a family member linked to the patient holds this permission.
    pub const fn is_permitted_for_family(self) -> bool {
        matches!(
            self,
            Self::ViewPatients
                | Self::ViewVisits
                | Self::ViewSupplyRequests
                | Self::CreateSupplyRequests
                | Self::ViewDeliveries
                | Self::ViewMessages
                | Self::SendMessages
        )
    }

    /// Team management, agency settings and reporting.
    pub const fn is_admin_only(self) -> bool {
        matches!(
            self,
            Self::ManageAgency
                | Self::ManageMembers
                | Self::InviteTeam
                | Self::ViewDashboards
                | Self::ViewAuditLogs
        )
    }

    /// Returns every permission an agency member with `role` holds.
    pub fn permissions_for_role(role: AgencyRole) -> Vec<Self> {
        Self::iter()
            .filter(|permission| permission.is_permitted_by_role(role))
            .collect()
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResult {
    pub granted: bool,
    pub member: Option<AgencyUser>,
    pub reason: Option<Cow<'static, str>>,
}

impl AuthResult {
    pub const fn granted() -> Self {
        Self {
            granted: true,
            member: None,
            reason: None,
        }
    }

    pub const fn granted_with_member(member: AgencyUser) -> Self {
        Self {
            granted: true,
            member: Some(member),
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            granted: false,
            member: None,
            reason: Some(reason.into()),
        }
    }

    /// Turns a denial into a 403 carrying the reason.
    pub fn into_result(self) -> Result<Option<AgencyUser>> {
        if self.granted {
            return Ok(self.member);
        }

        let error = match self.reason {
            Some(reason) => ErrorKind::Forbidden.with_message(reason),
            None => ErrorKind::Forbidden.into_error(),
        };

        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_hold_everything() {
        let permissions = Permission::permissions_for_role(AgencyRole::Admin);
        assert_eq!(permissions.len(), Permission::iter().count());
    }

    #[test]
    fn staff_cannot_manage_the_team() {
        assert!(!Permission::ManageMembers.is_permitted_by_role(AgencyRole::Staff));
        assert!(!Permission::InviteTeam.is_permitted_by_role(AgencyRole::Staff));
        assert!(!Permission::ViewDashboards.is_permitted_by_role(AgencyRole::Staff));
        assert!(!Permission::ViewAuditLogs.is_permitted_by_role(AgencyRole::Staff));
    }

    #[test]
    fn staff_handle_patient_care() {
        for permission in [
            Permission::ManagePatients,
            Permission::ManageVisits,
            Permission::ManageSupplyRequests,
            Permission::ManageDeliveries,
            Permission::SendMessages,
            Permission::InviteFamily,
        ] {
            assert!(permission.is_permitted_by_role(AgencyRole::Staff), "{permission}");
        }
    }

    #[test]
    fn family_reads_and_requests() {
        assert!(Permission::ViewVisits.is_permitted_for_family());
        assert!(Permission::ViewDeliveries.is_permitted_for_family());
        assert!(Permission::CreateSupplyRequests.is_permitted_for_family());
        assert!(Permission::SendMessages.is_permitted_for_family());

        assert!(!Permission::ManageVisits.is_permitted_for_family());
        assert!(!Permission::ManageDeliveries.is_permitted_for_family());
        assert!(!Permission::ManagePatients.is_permitted_for_family());
        assert!(!Permission::InviteFamily.is_permitted_for_family());
    }

    #[test]
    fn denial_is_forbidden() {
        let error = AuthResult::denied("Not a member of this agency")
            .into_result()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(error.message(), Some("Not a member of this agency"));
    }
}

//! Invitation model and its lifecycle.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::invitations;
use crate::types::{AgencyRole, InvitationKind, JobRole};

/// Invitation to join the portal as a facility admin, team member or family.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Invitation {
    pub id: Uuid,
    /// Agency the invitee joins; absent for facility invitations until accepted.
    pub agency_id: Option<Uuid>,
    pub kind: InvitationKind,
    pub email: String,
    /// Agency role granted by team invitations.
    pub agency_role: Option<AgencyRole>,
    pub job_role: Option<JobRole>,
    /// Patient followed by a family invitee.
    pub patient_id: Option<Uuid>,
    pub relationship: Option<String>,
    /// Single-use URL-safe token.
    pub token: String,
    pub invited_by: Uuid,
    pub expires_at: Timestamp,
    pub accepted_at: Option<Timestamp>,
    pub accepted_by: Option<Uuid>,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Data for creating an invitation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInvitation {
    pub agency_id: Option<Uuid>,
    pub kind: InvitationKind,
    pub email: String,
    pub agency_role: Option<AgencyRole>,
    pub job_role: Option<JobRole>,
    pub patient_id: Option<Uuid>,
    pub relationship: Option<String>,
    pub token: String,
    pub invited_by: Uuid,
    pub expires_at: Timestamp,
}

/// Where an invitation stands at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationState {
    /// Can still be accepted.
    Pending,
    /// Already consumed.
    Accepted,
    /// Withdrawn by the agency.
    Revoked,
    /// Lifetime passed without acceptance.
    Expired,
}

impl Invitation {
    /// Returns the state of the invitation at `now`.
    ///
    /// Acceptance wins over revocation and expiry, so a consumed token keeps
    /// reporting [`InvitationState::Accepted`].
    pub fn state_at(&self, now: jiff::Timestamp) -> InvitationState {
        if self.accepted_at.is_some() {
            InvitationState::Accepted
        } else if self.revoked_at.is_some() {
            InvitationState::Revoked
        } else if jiff::Timestamp::from(self.expires_at) <= now {
            InvitationState::Expired
        } else {
            InvitationState::Pending
        }
    }

    /// Returns the state of the invitation right now.
    pub fn state(&self) -> InvitationState {
        self.state_at(jiff::Timestamp::now())
    }

    /// Returns whether the invitation can be accepted right now.
    pub fn is_valid(&self) -> bool {
        self.state() == InvitationState::Pending
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.state() == InvitationState::Expired
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Span, ToSpan};

    use super::*;

    fn invitation(expires_in: Span) -> Invitation {
        let now = jiff::Timestamp::now();
        Invitation {
            id: Uuid::new_v4(),
            agency_id: Some(Uuid::new_v4()),
            kind: InvitationKind::Team,
            email: "nurse@example.org".into(),
            agency_role: Some(AgencyRole::Staff),
            job_role: Some(JobRole::Nurse),
            patient_id: None,
            relationship: None,
            token: "t".repeat(43),
            invited_by: Uuid::new_v4(),
            expires_at: now.checked_add(expires_in).unwrap_or(now).into(),
            accepted_at: None,
            accepted_by: None,
            revoked_at: None,
            created_at: now.into(),
        }
    }

    #[test]
    fn fresh_invitation_is_pending() {
        let invitation = invitation(168.hours());
        assert_eq!(invitation.state(), InvitationState::Pending);
        assert!(invitation.is_valid());
    }

    #[test]
    fn accepted_invitation_never_validates_again() {
        let mut invitation = invitation(168.hours());
        invitation.accepted_at = Some(jiff::Timestamp::now().into());
        invitation.accepted_by = Some(Uuid::new_v4());

        assert_eq!(invitation.state(), InvitationState::Accepted);
        assert!(!invitation.is_valid());
    }

    #[test]
    fn expiry_is_checked_against_the_given_instant() {
        let invitation = invitation(1.hour());
        let later = jiff::Timestamp::now() + 2.hours();
        assert_eq!(invitation.state_at(later), InvitationState::Expired);
    }

    #[test]
    fn revoked_invitation_is_not_valid() {
        let mut invitation = invitation(168.hours());
        invitation.revoked_at = Some(jiff::Timestamp::now().into());
        assert_eq!(invitation.state(), InvitationState::Revoked);
        assert!(invitation.is_revoked());
    }
}

//! Invitation repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use super::now;
use crate::model::{Invitation, NewInvitation};
use crate::types::{CursorPage, CursorPagination, InvitationKind};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for facility, team and family invitations.
pub trait InvitationRepository {
    fn create_invitation(
        &mut self,
        invitation: NewInvitation,
    ) -> impl Future<Output = PgResult<Invitation>> + Send;

    fn find_invitation_by_id(
        &mut self,
        invitation_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    /// Finds an invitation by token regardless of its state.
    fn find_invitation_by_token(
        &mut self,
        token: &str,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    /// Finds a pending invitation of the given kind for an email and agency.
    ///
    /// Facility invitations have no agency and are matched with `agency_id`
    /// set to `None`.
    fn find_pending_invitation(
        &mut self,
        email: &str,
        agency_id: Option<Uuid>,
        kind: InvitationKind,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    /// Finds the newest pending invitation addressed to an email.
    fn find_pending_invitation_for_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    /// Replaces the token and expiry of an invitation that was re-sent.
    fn refresh_invitation(
        &mut self,
        invitation_id: Uuid,
        token: String,
        expires_at: Timestamp,
        invited_by: Uuid,
    ) -> impl Future<Output = PgResult<Invitation>> + Send;

    /// Consumes an invitation.
    ///
    /// The update only matches a pending invitation, so of two concurrent
    /// calls with the same token exactly one returns `Some`.
    fn accept_invitation(
        &mut self,
        token: &str,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    /// Revokes a pending invitation of an agency.
    ///
    /// Returns `None` when no pending invitation matched.
    fn revoke_invitation(
        &mut self,
        agency_id: Uuid,
        invitation_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Invitation>>> + Send;

    /// Lists invitations of an agency, newest first.
    fn list_agency_invitations(
        &mut self,
        agency_id: Uuid,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<Invitation>>> + Send;
}

impl InvitationRepository for PgConnection {
    async fn create_invitation(&mut self, invitation: NewInvitation) -> PgResult<Invitation> {
        use schema::invitations;

        diesel::insert_into(invitations::table)
            .values(&invitation)
            .returning(Invitation::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_invitation_by_id(&mut self, invitation_id: Uuid) -> PgResult<Option<Invitation>> {
        use schema::invitations::dsl::*;

        invitations
            .filter(id.eq(invitation_id))
            .select(Invitation::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_invitation_by_token(&mut self, value: &str) -> PgResult<Option<Invitation>> {
        use schema::invitations::dsl::*;

        invitations
            .filter(token.eq(value))
            .select(Invitation::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_pending_invitation(
        &mut self,
        invitee: &str,
        agency: Option<Uuid>,
        invitation_kind: InvitationKind,
    ) -> PgResult<Option<Invitation>> {
        use schema::invitations::dsl::*;

        let mut query = invitations
            .filter(email.eq(invitee.trim().to_lowercase()))
            .filter(kind.eq(invitation_kind))
            .filter(accepted_at.is_null())
            .filter(revoked_at.is_null())
            .into_boxed();

        query = match agency {
            Some(agency) => query.filter(agency_id.eq(agency)),
            None => query.filter(agency_id.is_null()),
        };

        query
            .select(Invitation::as_select())
            .order(created_at.desc())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_pending_invitation_for_email(
        &mut self,
        invitee: &str,
    ) -> PgResult<Option<Invitation>> {
        use schema::invitations::dsl::*;

        invitations
            .filter(email.eq(invitee.trim().to_lowercase()))
            .filter(accepted_at.is_null())
            .filter(revoked_at.is_null())
            .filter(expires_at.gt(now()))
            .select(Invitation::as_select())
            .order(created_at.desc())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn refresh_invitation(
        &mut self,
        invitation_id: Uuid,
        new_token: String,
        new_expires_at: Timestamp,
        inviter: Uuid,
    ) -> PgResult<Invitation> {
        use schema::invitations::dsl::*;

        diesel::update(invitations)
            .filter(id.eq(invitation_id))
            .set((
                token.eq(new_token),
                expires_at.eq(new_expires_at),
                invited_by.eq(inviter),
            ))
            .returning(Invitation::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn accept_invitation(
        &mut self,
        value: &str,
        account_id: Uuid,
    ) -> PgResult<Option<Invitation>> {
        use schema::invitations::dsl::*;

        let accepted = now();
        let invitation = diesel::update(invitations)
            .filter(token.eq(value))
            .filter(accepted_at.is_null())
            .filter(revoked_at.is_null())
            .filter(expires_at.gt(accepted))
            .set((accepted_at.eq(Some(accepted)), accepted_by.eq(Some(account_id))))
            .returning(Invitation::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(invitation)
    }

    async fn revoke_invitation(
        &mut self,
        agency: Uuid,
        invitation_id: Uuid,
    ) -> PgResult<Option<Invitation>> {
        use schema::invitations::dsl::*;

        diesel::update(invitations)
            .filter(id.eq(invitation_id))
            .filter(agency_id.eq(agency))
            .filter(accepted_at.is_null())
            .filter(revoked_at.is_null())
            .set(revoked_at.eq(Some(now())))
            .returning(Invitation::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_agency_invitations(
        &mut self,
        agency: Uuid,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<Invitation>> {
        use schema::invitations::dsl::*;

        let mut query = invitations.filter(agency_id.eq(agency)).into_boxed();
        if let Some(cursor) = pagination.after {
            let cursor_ts = Timestamp::from(cursor.timestamp);
            query = query.filter(
                created_at
                    .lt(cursor_ts)
                    .or(created_at.eq(cursor_ts).and(id.lt(cursor.id))),
            );
        }

        let items = query
            .select(Invitation::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |invitation| {
            (invitation.created_at.into(), invitation.id)
        }))
    }
}

//! Account, agency and audit constraint violation handlers.

use hospice_postgres::types::{
    AccountConstraints, AccountSessionConstraints, AgencyConstraints, AgencyUserConstraints,
    AuditLogConstraints, InvitationConstraints,
};

use crate::handler::{Error, ErrorKind};

impl From<AccountConstraints> for Error<'static> {
    fn from(c: AccountConstraints) -> Self {
        let error = match c {
            AccountConstraints::EmailLowercase | AccountConstraints::EmailFormat => {
                ErrorKind::BadRequest.with_message("Invalid email format")
            }
            AccountConstraints::EmailLengthMax => {
                ErrorKind::BadRequest.with_message("Email address is too long")
            }
            AccountConstraints::DisplayNameLength => ErrorKind::BadRequest
                .with_message("Display name must be between 1 and 120 characters"),
            AccountConstraints::PasswordHashNotEmpty => {
                ErrorKind::BadRequest.with_message("Password cannot be empty")
            }
            AccountConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
            AccountConstraints::EmailUnique => ErrorKind::Conflict
                .with_message("An account with this email address already exists"),
        };

        error.with_resource("account")
    }
}

impl From<AccountSessionConstraints> for Error<'static> {
    fn from(c: AccountSessionConstraints) -> Self {
        let error = match c {
            AccountSessionConstraints::ExpiresAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("account_session")
    }
}

impl From<AgencyConstraints> for Error<'static> {
    fn from(c: AgencyConstraints) -> Self {
        let error = match c {
            AgencyConstraints::NameLength => ErrorKind::BadRequest
                .with_message("Agency name must be between 2 and 160 characters"),
            AgencyConstraints::SlugFormat => ErrorKind::BadRequest
                .with_message("Agency slug may only contain lowercase letters, digits and dashes"),
            AgencyConstraints::PhoneLengthMax => {
                ErrorKind::BadRequest.with_message("Phone number is too long")
            }
            AgencyConstraints::TimezoneNotEmpty => {
                ErrorKind::BadRequest.with_message("Timezone cannot be empty")
            }
            AgencyConstraints::SlugUnique => {
                ErrorKind::Conflict.with_message("An agency with this slug already exists")
            }
        };

        error.with_resource("agency")
    }
}

impl From<AgencyUserConstraints> for Error<'static> {
    fn from(c: AgencyUserConstraints) -> Self {
        let error = match c {
            AgencyUserConstraints::AccountUnique => ErrorKind::Conflict
                .with_message("This account already belongs to an agency"),
        };

        error.with_resource("agency_member")
    }
}

impl From<AuditLogConstraints> for Error<'static> {
    fn from(c: AuditLogConstraints) -> Self {
        let error = match c {
            AuditLogConstraints::ActionNotEmpty | AuditLogConstraints::MetadataObject => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("audit_log")
    }
}

impl From<InvitationConstraints> for Error<'static> {
    fn from(c: InvitationConstraints) -> Self {
        let error = match c {
            InvitationConstraints::EmailLowercase => {
                ErrorKind::BadRequest.with_message("Invalid email format")
            }
            InvitationConstraints::TeamHasAgency => {
                ErrorKind::BadRequest.with_message("Team invitations require an agency")
            }
            InvitationConstraints::FamilyHasPatient => {
                ErrorKind::BadRequest.with_message("Family invitations require a patient")
            }
            InvitationConstraints::TokenLength
            | InvitationConstraints::ExpiresAfterCreated
            | InvitationConstraints::AcceptedHasAccount
            | InvitationConstraints::TokenUnique => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("invitation")
    }
}

//! Database error to HTTP error conversion.
//!
//! Known constraint violations map to precise 400/409 responses through the
//! per-table conversions in the sibling `pg_*` modules. Unknown unique and
//! foreign key violations fall back to 409 and 400, pool timeouts to 503,
//! and everything else to 500.

use hospice_postgres::PgError;
use hospice_postgres::error::DieselError;
use hospice_postgres::types::ConstraintViolation;

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "hospice_server::handler::postgres";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::Account(c) => c.into(),
            ConstraintViolation::AccountSession(c) => c.into(),
            ConstraintViolation::Agency(c) => c.into(),
            ConstraintViolation::AgencyUser(c) => c.into(),
            ConstraintViolation::AuditLog(c) => c.into(),
            ConstraintViolation::Patient(c) => c.into(),
            ConstraintViolation::FamilyMember(c) => c.into(),
            ConstraintViolation::Invitation(c) => c.into(),
            ConstraintViolation::Visit(c) => c.into(),
            ConstraintViolation::SupplyRequest(c) => c.into(),
            ConstraintViolation::Delivery(c) => c.into(),
            ConstraintViolation::Message(c) => c.into(),
            ConstraintViolation::MessageThread(c) => c.into(),
            ConstraintViolation::ThreadMessage(c) => c.into(),
            ConstraintViolation::Notification(c) => c.into(),
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if let Some(constraint) = error.constraint_violation() {
            tracing::warn!(
                target: TRACING_TARGET,
                constraint = %constraint,
                error = %error,
                "constraint violation"
            );
            return constraint.into();
        }

        match error {
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout"
                );
                ErrorKind::ServiceUnavailable
                    .with_message("The database is busy, please retry shortly")
            }
            PgError::Connection(ref connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::ServiceUnavailable.into_error()
            }
            ref query_error @ PgError::Query(_) if query_error.is_unique_violation() => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    constraint = ?query_error.constraint(),
                    error = %query_error,
                    "unmapped unique violation"
                );
                ErrorKind::Conflict.with_message("The resource already exists")
            }
            ref query_error @ PgError::Query(_) if query_error.is_foreign_key_violation() => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    constraint = ?query_error.constraint(),
                    error = %query_error,
                    "unmapped foreign key violation"
                );
                ErrorKind::BadRequest.with_message("A referenced resource does not exist")
            }
            PgError::Query(query_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

// Used only for transactions.
impl From<DieselError> for Error<'static> {
    fn from(error: DieselError) -> Self {
        PgError::from(error).into()
    }
}

#[cfg(test)]
mod tests {
    use hospice_postgres::error::TimeoutType;
    use hospice_postgres::types::{
        AccountConstraints, AgencyUserConstraints, InvitationConstraints, VisitConstraints,
    };

    use super::*;

    #[test]
    fn unique_constraints_conflict() {
        let error: Error = ConstraintViolation::Account(AccountConstraints::EmailUnique).into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("account"));

        let error: Error =
            ConstraintViolation::AgencyUser(AgencyUserConstraints::AccountUnique).into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn check_constraints_are_bad_requests() {
        let error: Error = ConstraintViolation::Visit(VisitConstraints::NotesLengthMax).into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("visit"));
    }

    #[test]
    fn invariant_constraints_are_internal() {
        let error: Error =
            ConstraintViolation::Invitation(InvitationConstraints::AcceptedHasAccount).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn timeouts_are_unavailable() {
        let error: Error = PgError::Timeout(TimeoutType::Wait).into();
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn not_found_query_is_internal() {
        let error: Error = DieselError::NotFound.into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}

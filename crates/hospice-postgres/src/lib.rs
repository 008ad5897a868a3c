#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Embeds all migrations into the final binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!("./src/migrations");

/// Tracing target for client lifecycle and configuration events.
pub const TRACING_TARGET_CLIENT: &str = "hospice_postgres::client";

/// Tracing target for query execution.
pub const TRACING_TARGET_QUERY: &str = "hospice_postgres::query";

/// Tracing target for schema migrations.
pub const TRACING_TARGET_MIGRATION: &str = "hospice_postgres::migration";

/// Tracing target for pool and connection events.
pub const TRACING_TARGET_CONNECTION: &str = "hospice_postgres::connection";

mod client;
pub mod model;
pub mod query;
mod schema;
pub mod types;

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::ConnectionError;
use diesel::result::{DatabaseErrorKind, Error};
pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, MigrationStatus, PgClient, PgClientMigrationExt, PgConfig,
    PgConn, PgPoolStatus, PooledConnection, migration_status, run_pending_migrations,
};
use crate::types::ConstraintViolation;

pub mod error {
    //! Error types and helpers for database operations.
    //!
    //! See [`PgError`] for the main error type used throughout this crate.
    //!
    //! [`PgError`]: crate::PgError

    /// Type-erased error type for dynamic error handling.
    pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

    use std::borrow::Cow;

    pub use deadpool::managed::TimeoutType;
    pub use diesel::result::{ConnectionError as DieselConnectionError, Error as DieselError};
    pub use diesel_async::pooled_connection::PoolError as DieselPoolError;
    pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

    /// Operator-facing remediation hint for an error.
    pub trait ErrorHint {
        /// Returns a short hint describing how to resolve the error.
        fn hint(&self) -> Cow<'static, str>;
    }

    impl ErrorHint for TimeoutType {
        fn hint(&self) -> Cow<'static, str> {
            match self {
                TimeoutType::Wait => Cow::Borrowed(
                    "All pooled connections are busy, raise the pool size or shorten transactions",
                ),
                TimeoutType::Create => Cow::Borrowed(
                    "Could not open a new connection, verify the database URL and that the server is reachable",
                ),
                TimeoutType::Recycle => Cow::Borrowed(
                    "A pooled connection could not be recycled and is likely broken",
                ),
            }
        }
    }
}

/// Error type for all PostgreSQL operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Waiting for, creating or recycling a pooled connection timed out.
    #[error("Database operation timed out")]
    Timeout(TimeoutType),

    /// A connection could not be established or was lost.
    #[error("Database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Applying embedded migrations failed.
    #[error("Database migration error: {0}")]
    Migration(error::BoxError),

    /// Query execution failed, including constraint violations.
    #[error("Database query error: {0}")]
    Query(#[from] Error),

    /// Anything not covered by the other variants.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Returns the name of the violated constraint, if any.
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(err) = self else {
            return None;
        };

        let Error::DatabaseError(_, err) = err else {
            return None;
        };

        err.constraint_name()
    }

    /// Returns the typed constraint violation, if the constraint is known.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    /// Returns whether this error is a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            PgError::Query(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        )
    }

    /// Returns whether this error is a foreign key violation.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            PgError::Query(Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _))
        )
    }

    /// Returns whether retrying the operation might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_)
                | PgError::Connection(ConnectionError::BadConnection(_))
                | PgError::Query(Error::DatabaseError(
                    DatabaseErrorKind::SerializationFailure,
                    _
                ))
        )
    }

    /// Returns whether the error requires a data, schema or config change to resolve.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

impl From<error::DeadpoolError> for PgError {
    fn from(value: error::DeadpoolError) -> Self {
        use deadpool::managed::PoolError;
        use diesel_async::pooled_connection::PoolError as ManagerError;

        match value {
            PoolError::Timeout(timeout) => PgError::Timeout(timeout),
            PoolError::Backend(ManagerError::ConnectionError(err)) => PgError::Connection(err),
            PoolError::Backend(ManagerError::QueryError(err)) => PgError::Query(err),
            PoolError::PostCreateHook(err) => {
                PgError::Unexpected(format!("post-create hook failed: {err}").into())
            }
            PoolError::NoRuntimeSpecified => {
                PgError::Unexpected(Cow::Borrowed("connection pool has no async runtime"))
            }
            PoolError::Closed => PgError::Unexpected(Cow::Borrowed("connection pool is closed")),
        }
    }
}

/// Specialized [`Result`] type for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorHint;

    #[test]
    fn timeouts_are_transient() {
        let error = PgError::Timeout(TimeoutType::Wait);
        assert!(error.is_transient());
        assert!(!error.is_permanent());
        assert!(!TimeoutType::Wait.hint().is_empty());
    }

    #[test]
    fn config_errors_are_permanent() {
        let error = PgError::Config("missing url".into());
        assert!(error.is_permanent());
        assert!(error.constraint().is_none());
        assert!(error.constraint_violation().is_none());
    }

    #[test]
    fn closed_pool_maps_to_unexpected() {
        let error = PgError::from(error::DeadpoolError::Closed);
        assert!(matches!(error, PgError::Unexpected(_)));
    }

    #[test]
    fn not_found_is_not_a_violation() {
        let error = PgError::Query(Error::NotFound);
        assert!(!error.is_unique_violation());
        assert!(!error.is_foreign_key_violation());
    }
}

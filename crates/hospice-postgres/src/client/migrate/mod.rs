//! Embedded schema migrations.

mod client_ext;
mod migrate_result;
mod run_migration;

pub use self::client_ext::PgClientMigrationExt;
pub use self::migrate_result::{MigrationResult, MigrationStatus};
pub use self::run_migration::{migration_status, run_pending_migrations};

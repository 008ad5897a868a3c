use std::future::Future;

use super::{MigrationResult, MigrationStatus, migration_status, run_pending_migrations};
use crate::{PgClient, PgResult};

/// Migration helpers available directly on [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every pending migration. Calling it on an up-to-date schema is a no-op.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>>;

    /// Lists applied and pending migration versions.
    fn migration_status(&self) -> impl Future<Output = PgResult<MigrationStatus>>;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }

    async fn migration_status(&self) -> PgResult<MigrationStatus> {
        migration_status(self).await
    }
}

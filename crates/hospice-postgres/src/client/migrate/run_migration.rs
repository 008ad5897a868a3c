use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::{MigrationResult, MigrationStatus};
use crate::error::BoxError;
use crate::{MIGRATIONS, PgClient, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

type BlockingConnection = AsyncConnectionWrapper<PooledConnection>;

/// Runs `f` against a blocking wrapper around a pooled connection.
///
/// The migration harness is synchronous, so it runs on the blocking pool.
async fn with_blocking_connection<T, F>(pg: &PgClient, f: F) -> PgResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut BlockingConnection) -> Result<T, BoxError> + Send + 'static,
{
    let conn = pg.get_pooled_connection().await?;
    let mut conn: BlockingConnection = conn.into();

    spawn_blocking(move || f(&mut conn))
        .await
        .map_err(|err| PgError::Migration(err.into()))?
        .map_err(PgError::Migration)
}

/// Lists applied and pending migration versions.
pub async fn migration_status(pg: &PgClient) -> PgResult<MigrationStatus> {
    with_blocking_connection(pg, |conn| {
        let applied = conn
            .applied_migrations()?
            .into_iter()
            .map(|version| version.to_string())
            .collect::<Vec<_>>();
        let pending = conn
            .pending_migrations(MIGRATIONS)?
            .into_iter()
            .map(|migration| migration.name().version().to_string())
            .collect::<Vec<_>>();

        Ok(MigrationStatus::new(applied, pending))
    })
    .await
}

/// Applies every pending migration.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let started_at = Instant::now();
    let status = migration_status(pg).await?;

    if status.is_up_to_date() {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            version = status.last_applied_version(),
            "database schema is up to date"
        );
        return Ok(MigrationResult::success(started_at.elapsed(), Vec::new()));
    }

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        pending = status.pending_migrations(),
        "applying pending migrations"
    );

    let applied = with_blocking_connection(pg, |conn| {
        let versions = conn.run_pending_migrations(MIGRATIONS)?;
        Ok(versions
            .into_iter()
            .map(|version| version.to_string())
            .collect::<Vec<_>>())
    })
    .await
    .inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            elapsed = ?started_at.elapsed(),
            "migration run failed"
        );
    })?;

    let duration = started_at.elapsed();
    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        applied = applied.len(),
        duration = ?duration,
        "migrations applied"
    );

    Ok(MigrationResult::success(duration, applied))
}

//! Connection setup and pool lifecycle hooks.

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::TRACING_TARGET_CONNECTION;

/// Replaces the password in a connection URL with `***`.
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@')
        && let Some(colon_pos) = url[..at_pos].rfind(':')
        && !url[colon_pos + 1..at_pos].starts_with("//")
    {
        let mut masked = url.to_owned();
        masked.replace_range(colon_pos + 1..at_pos, "***");
        return masked;
    }

    url.to_owned()
}

/// Establishes a new connection for the pool manager.
///
/// See [`ManagerConfig`](diesel_async::pooled_connection::ManagerConfig).
pub fn setup_callback<C>(addr: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    let started_at = Instant::now();
    let masked_addr = mask_url(addr);

    async move {
        let result = C::establish(addr).await;
        let elapsed_ms = started_at.elapsed().as_millis();

        match &result {
            Ok(_) => tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                addr = %masked_addr,
                elapsed_ms,
                "connection established"
            ),
            Err(err) => tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                addr = %masked_addr,
                elapsed_ms,
                error = %err,
                "failed to establish connection"
            ),
        }

        result
    }
    .boxed()
}

/// Runs once after a connection joins the pool.
pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            created_at = ?metrics.created,
            "new connection is already broken"
        );
    }

    Ok(())
}

/// Runs before a returned connection is handed out again.
pub fn pre_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    tracing::trace!(
        target: TRACING_TARGET_CONNECTION,
        recycle_count = metrics.recycle_count,
        is_broken = conn.is_broken(),
        "recycling connection"
    );

    Ok(())
}

/// Runs after a connection passed recycling.
pub fn post_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::error!(
            target: TRACING_TARGET_CONNECTION,
            recycle_count = metrics.recycle_count,
            last_used = ?metrics.last_used(),
            "connection is broken after recycling"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::mask_url;

    #[test]
    fn masks_password() {
        assert_eq!(
            mask_url("postgresql://hospice:s3cret@db:5432/portal"),
            "postgresql://hospice:***@db:5432/portal"
        );
    }

    #[test]
    fn leaves_passwordless_urls_alone() {
        assert_eq!(
            mask_url("postgresql://hospice@db/portal"),
            "postgresql://hospice@db/portal"
        );
        assert_eq!(mask_url("postgresql://db/portal"), "postgresql://db/portal");
    }
}

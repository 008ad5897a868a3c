//! Pooled database connection extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use hospice_postgres::{PgClient, PgConn};

use crate::handler::Error;

/// A connection checked out of the pool for the lifetime of the request.
///
/// Pool exhaustion and connection failures reject with 503.
///
/// ```rust,no_run
/// use hospice_postgres::query::PatientRepository;
/// use hospice_server::extract::PgPool;
///
/// async fn handler(PgPool(mut conn): PgPool) {
///     let _ = conn.find_patient_by_id(uuid::Uuid::nil()).await;
/// }
/// ```
#[derive(Debug, Deref, DerefMut)]
pub struct PgPool(pub PgConn);

impl<S> FromRequestParts<S> for PgPool
where
    PgClient: FromRef<S>,
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pg_client = PgClient::from_ref(state);
        let conn = pg_client.get_connection().await?;
        Ok(PgPool(conn))
    }
}

impl aide::OperationInput for PgPool {}

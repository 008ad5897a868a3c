use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "hospice_server::extract::query";

/// Query string extractor.
///
/// ```rust,no_run
/// use hospice_server::extract::Query;
/// use serde::Deserialize;
/// use uuid::Uuid;
///
/// #[derive(Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct VisitFilter {
///     patient_id: Option<Uuid>,
///     limit: Option<i64>,
/// }
///
/// // GET /visits?patientId=123e4567-e89b-12d3-a456-426614174000&limit=20
/// async fn list(Query(filter): Query<VisitFilter>) {
///     let _ = (filter.patient_id, filter.limit);
/// }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(enhance_query_error(rejection)),
        }
    }
}

/// Turns a query rejection into a 400 that names the parameter when possible.
fn enhance_query_error(rejection: QueryRejection) -> Error<'static> {
    tracing::debug!(
        target: TRACING_TARGET,
        error = %rejection,
        "query parameter parsing failed"
    );

    let QueryRejection::FailedToDeserializeQueryString(err) = rejection else {
        return ErrorKind::BadRequest.with_message("Invalid query parameters");
    };

    let error_message = err.body_text();
    let field_name = extract_field_name_from_error(&error_message);

    if error_message.contains("missing field") {
        ErrorKind::BadRequest.with_message(format!(
            "Missing required query parameter '{}'",
            field_name.unwrap_or("unknown")
        ))
    } else if error_message.contains("duplicate field") {
        ErrorKind::BadRequest.with_message(format!(
            "Query parameter '{}' was provided more than once",
            field_name.unwrap_or("unknown")
        ))
    } else {
        ErrorKind::BadRequest
            .with_message("Invalid query parameter")
            .with_context(error_message)
    }
}

/// Best-effort extraction of a field name from a serde error message.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    if let Some(start) = error_message.find('`')
        && let Some(end) = error_message[start + 1..].find('`')
    {
        return Some(&error_message[start + 1..start + 1 + end]);
    }

    if let Some(start) = error_message.find("field ") {
        let field_part = &error_message[start + 6..];
        if let Some(end) = field_part.find(' ') {
            return Some(&field_part[..end]);
        }
    }

    None
}

impl<T> aide::OperationInput for Query<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumQuery::<T>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_name_from_backticks() {
        assert_eq!(
            extract_field_name_from_error("missing field `patientId`"),
            Some("patientId")
        );
    }

    #[test]
    fn field_name_from_plain_text() {
        assert_eq!(
            extract_field_name_from_error("duplicate field limit at line 1"),
            Some("limit")
        );
        assert_eq!(extract_field_name_from_error("some other error"), None);
    }
}

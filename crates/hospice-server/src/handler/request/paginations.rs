//! Cursor pagination query parameters.

use hospice_postgres::types::CursorPagination;
use hospice_postgres::types::constants::pagination::DEFAULT_PAGE_SIZE;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::handler::{ErrorKind, Result};

/// Query parameters shared by every list endpoint.
///
/// Pages are ordered newest first. Pass the `nextCursor` of one page as the
/// `cursor` of the next. A cursor that does not decode is rejected.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CursorQuery {
    /// Maximum number of items to return (1-100, default 50).
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,

    /// Opaque cursor returned by the previous page.
    #[validate(length(max = 128))]
    pub cursor: Option<String>,
}

impl CursorQuery {
    /// Returns the page size, falling back to the default.
    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Converts into repository pagination.
    ///
    /// Fails with 400 when the cursor is not one this server issued.
    pub fn into_pagination(self) -> Result<CursorPagination> {
        CursorPagination::from_cursor_string(Some(self.limit()), self.cursor.as_deref()).ok_or_else(
            || {
                ErrorKind::BadRequest
                    .with_message("Invalid pagination cursor")
                    .with_resource("cursor")
                    .with_suggestion("Pass the nextCursor of a previous page, or omit it to start over")
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_standard_page_size() -> anyhow::Result<()> {
        let pagination = CursorQuery::default().into_pagination()?;
        assert_eq!(pagination.limit, DEFAULT_PAGE_SIZE);
        assert!(pagination.after.is_none());
        Ok(())
    }

    #[test]
    fn undecodable_cursor_is_a_bad_request() {
        let query = CursorQuery {
            limit: Some(10),
            cursor: Some("!!garbage!!".to_owned()),
        };

        let error = query.into_pagination().err();
        assert_eq!(error.map(|err| err.kind()), Some(ErrorKind::BadRequest));
    }

    #[test]
    fn rejects_out_of_range_limits() {
        for limit in [0, 101] {
            let query = CursorQuery {
                limit: Some(limit),
                cursor: None,
            };
            assert!(query.validate().is_err(), "{limit}");
        }
    }
}

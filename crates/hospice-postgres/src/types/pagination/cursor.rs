//! Keyset pagination over `(created_at, id)`.

use base64::prelude::*;
use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::constants::pagination::DEFAULT_PAGE_SIZE;

/// Largest page a caller may request.
pub const MAX_LIMIT: i64 = 100;

/// Position of the last row a caller has seen.
///
/// Encoded on the wire as URL-safe base64 of `"{timestamp}|{id}"`; the id
/// breaks ties between rows created in the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(into = "String", try_from = "String")]
pub struct Cursor {
    pub timestamp: Timestamp,
    pub id: Uuid,
}

impl Cursor {
    /// Creates a cursor pointing at the given row.
    pub fn new(timestamp: Timestamp, id: Uuid) -> Self {
        Self { timestamp, id }
    }

    /// Encodes the cursor as an opaque string.
    pub fn encode(&self) -> String {
        let data = format!("{}|{}", self.timestamp, self.id);
        BASE64_URL_SAFE_NO_PAD.encode(data.as_bytes())
    }

    /// Decodes an opaque cursor, returning `None` when it is malformed.
    pub fn decode(encoded: &str) -> Option<Self> {
        let bytes = BASE64_URL_SAFE_NO_PAD.decode(encoded).ok()?;
        let data = String::from_utf8(bytes).ok()?;
        let (timestamp, id) = data.split_once('|')?;

        Some(Self {
            timestamp: timestamp.parse().ok()?,
            id: id.parse().ok()?,
        })
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<Cursor> for String {
    fn from(cursor: Cursor) -> Self {
        cursor.encode()
    }
}

impl TryFrom<String> for Cursor {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cursor::decode(&value).ok_or("invalid cursor format")
    }
}

/// Page size and starting point of a list query.
///
/// Queries order rows newest first and fetch [`fetch_limit`] rows so the
/// extra row reveals whether another page exists.
///
/// [`fetch_limit`]: CursorPagination::fetch_limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CursorPagination {
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Cursor>,
}

impl Default for CursorPagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CursorPagination {
    /// Creates pagination for the first page, clamping `limit` into `1..=100`.
    pub fn new(limit: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            after: None,
        }
    }

    /// Creates pagination from request parameters.
    ///
    /// A missing limit falls back to the default page size. Returns `None`
    /// when the cursor does not decode.
    pub fn from_cursor_string(limit: Option<i64>, cursor: Option<&str>) -> Option<Self> {
        let after = match cursor {
            Some(encoded) => Some(Cursor::decode(encoded)?),
            None => None,
        };

        Some(Self {
            after,
            ..Self::new(limit.unwrap_or(DEFAULT_PAGE_SIZE))
        })
    }

    /// Returns the number of rows to fetch: one more than the page size.
    #[inline]
    pub fn fetch_limit(&self) -> i64 {
        self.limit + 1
    }
}

/// One page of a cursor-paginated list.
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// Cursor for the next page, present only when more rows exist.
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    /// Builds a page from up to `limit + 1` fetched rows.
    pub fn new<F>(mut items: Vec<T>, limit: i64, cursor_fn: F) -> Self
    where
        F: Fn(&T) -> (Timestamp, Uuid),
    {
        let has_more = items.len() as i64 > limit;
        if has_more {
            items.truncate(limit.max(0) as usize);
        }

        let next_cursor = has_more
            .then(|| items.last())
            .flatten()
            .map(|item| {
                let (timestamp, id) = cursor_fn(item);
                Cursor::new(timestamp, id).encode()
            });

        Self { items, next_cursor }
    }

    /// Returns whether another page exists.
    #[inline]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Converts every item, keeping the cursor.
    pub fn map<U, F>(self, f: F) -> CursorPage<U>
    where
        F: FnMut(T) -> U,
    {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_survives_encoding() {
        let cursor = Cursor::new(Timestamp::now(), Uuid::new_v4());
        assert_eq!(Cursor::decode(&cursor.encode()), Some(cursor));
    }

    #[test]
    fn malformed_cursors_are_rejected() {
        assert!(Cursor::decode("").is_none());
        assert!(Cursor::decode("not base64 !").is_none());
        assert!(Cursor::decode(&BASE64_URL_SAFE_NO_PAD.encode("no-separator")).is_none());
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(CursorPagination::new(0).limit, 1);
        assert_eq!(CursorPagination::new(500).limit, MAX_LIMIT);
        assert_eq!(CursorPagination::default().limit, DEFAULT_PAGE_SIZE);
        assert_eq!(CursorPagination::new(20).fetch_limit(), 21);
    }

    #[test]
    fn bad_cursor_string_is_rejected() {
        assert!(CursorPagination::from_cursor_string(Some(10), Some("!!garbage!!")).is_none());
        assert!(CursorPagination::from_cursor_string(Some(10), Some("")).is_none());
    }

    #[test]
    fn cursor_string_resumes_after_row() {
        let cursor = Cursor::new(Timestamp::now(), Uuid::new_v4());
        let pagination = CursorPagination::from_cursor_string(None, Some(&cursor.encode()));

        assert_eq!(pagination.map(|p| p.after), Some(Some(cursor)));
        assert_eq!(
            CursorPagination::from_cursor_string(Some(10), None),
            Some(CursorPagination::new(10))
        );
    }

    #[test]
    fn page_detects_more_rows() {
        let stamp = Timestamp::now();
        let ids: Vec<Uuid> = (0..11).map(|_| Uuid::new_v4()).collect();

        let page = CursorPage::new(ids.clone(), 10, |id| (stamp, *id));
        assert_eq!(page.items.len(), 10);
        let next = page.next_cursor.as_deref().and_then(Cursor::decode);
        assert_eq!(next.map(|c| c.id), Some(ids[9]));

        let page = CursorPage::new(ids[..5].to_vec(), 10, |id| (stamp, *id));
        assert!(!page.has_more());
    }
}

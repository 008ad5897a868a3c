//! Response types for HTTP handlers.

use hospice_postgres::types::CursorPage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod accounts;
mod agencies;
mod authentications;
mod dashboards;
mod deliveries;
mod errors;
mod invitations;
mod members;
mod messages;
mod monitors;
mod notifications;
mod onboarding;
mod patients;
mod supplies;
mod threads;
mod visits;
mod webhooks;

pub use accounts::*;
pub use agencies::*;
pub use authentications::*;
pub use dashboards::*;
pub use deliveries::*;
pub use errors::*;
pub use invitations::*;
pub use members::*;
pub use messages::*;
pub use monitors::*;
pub use notifications::*;
pub use onboarding::*;
pub use patients::*;
pub use supplies::*;
pub use threads::*;
pub use visits::*;
pub use webhooks::*;

/// Generic paginated response wrapper.
///
/// `nextCursor` is `null` on the last page; otherwise pass it back as the
/// `cursor` query parameter.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(rename = "{T}sPage")]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in this page, newest first.
    pub items: Vec<T>,
    /// Cursor to fetch the next page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Creates a single page holding every item.
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Returns true if there are more items to fetch.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Converts a repository page, mapping every item.
    pub fn from_cursor_page<U, F>(page: CursorPage<U>, f: F) -> Self
    where
        F: FnMut(U) -> T,
    {
        let page = page.map(f);
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_null_cursor_on_last_page() -> anyhow::Result<()> {
        let page = Page::complete(vec![1, 2]);
        assert!(!page.has_more());

        let json = serde_json::to_value(&page)?;
        assert_eq!(json, serde_json::json!({ "items": [1, 2], "nextCursor": null }));
        Ok(())
    }
}

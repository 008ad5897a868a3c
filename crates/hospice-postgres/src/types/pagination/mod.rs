//! Pagination for list queries.

mod cursor;

pub use cursor::{Cursor, CursorPage, CursorPagination, MAX_LIMIT};

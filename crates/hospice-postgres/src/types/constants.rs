//! Constants shared by queries and the server.

/// Invitation lifetimes.
pub mod invitation {
    /// Days an invitation stays valid when the caller does not pick a lifetime.
    pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

    /// Longest lifetime a caller may request, in days.
    pub const MAX_EXPIRY_DAYS: i64 = 30;

    /// Random bytes in an invitation token before encoding.
    pub const TOKEN_BYTES: usize = 32;
}

/// Session lifetimes.
pub mod session {
    /// Hours a login session remains valid.
    pub const DEFAULT_LIFETIME_HOURS: i64 = 24 * 7;
}

/// Pagination defaults.
pub mod pagination {
    /// Page size when the caller does not pick one.
    pub const DEFAULT_PAGE_SIZE: i64 = 50;
}

/// Supply request limits.
pub mod supply {
    /// Largest quantity accepted in one request line.
    pub const MAX_QUANTITY: i32 = 100;
}

/// Dashboard windows.
pub mod dashboard {
    /// Days of history in compliance and analytics reports.
    pub const REPORT_WINDOW_DAYS: i64 = 30;
}

use std::time::Duration;

/// Applied and pending migration versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Applied versions, oldest first.
    pub applied_versions: Vec<String>,
    /// Versions embedded in the binary but not yet applied.
    pub pending_versions: Vec<String>,
}

impl MigrationStatus {
    /// Creates a new migration status.
    pub fn new(
        applied_versions: impl Into<Vec<String>>,
        pending_versions: impl Into<Vec<String>>,
    ) -> Self {
        Self {
            applied_versions: applied_versions.into(),
            pending_versions: pending_versions.into(),
        }
    }

    /// Returns the most recently applied version.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }

    /// Returns the number of pending migrations.
    #[inline]
    pub fn pending_migrations(&self) -> usize {
        self.pending_versions.len()
    }

    /// Returns whether nothing is left to apply.
    #[inline]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_versions.is_empty()
    }
}

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Wall time of the run.
    pub duration: Duration,
    /// Versions applied by this run.
    pub processed_versions: Vec<String>,
    /// Failure description, if the run failed.
    pub error_message: Option<String>,
}

impl MigrationResult {
    /// Creates a successful result.
    pub fn success(duration: Duration, processed_versions: Vec<String>) -> Self {
        Self {
            duration,
            processed_versions,
            error_message: None,
        }
    }

    /// Creates a failed result.
    pub fn failure(duration: Duration, error_message: impl Into<String>) -> Self {
        Self {
            duration,
            processed_versions: Vec::new(),
            error_message: Some(error_message.into()),
        }
    }

    /// Returns whether the run succeeded.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
    }

    /// Returns whether the run succeeded without applying anything.
    #[inline]
    pub fn is_no_op(&self) -> bool {
        self.is_success() && self.processed_versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reports_pending() {
        let status = MigrationStatus::new(
            vec!["20250101000000".to_owned()],
            vec!["20250201000000".to_owned()],
        );
        assert!(!status.is_up_to_date());
        assert_eq!(status.pending_migrations(), 1);
        assert_eq!(status.last_applied_version(), Some("20250101000000"));
    }

    #[test]
    fn empty_status_is_up_to_date() {
        assert!(MigrationStatus::default().is_up_to_date());
    }

    #[test]
    fn result_outcomes() {
        let applied = MigrationResult::success(Duration::from_millis(12), vec!["1".to_owned()]);
        assert!(applied.is_success());
        assert!(!applied.is_no_op());

        let noop = MigrationResult::success(Duration::ZERO, Vec::new());
        assert!(noop.is_no_op());

        let failed = MigrationResult::failure(Duration::ZERO, "syntax error");
        assert!(!failed.is_success());
        assert_eq!(failed.error_message.as_deref(), Some("syntax error"));
    }
}

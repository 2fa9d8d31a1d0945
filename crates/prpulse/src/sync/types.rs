//! Sync types and constants.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::retry::RetryPolicy;

/// Items requested per listing page. GitHub's maximum.
pub const DEFAULT_PAGE_SIZE: u8 = 100;

/// Pause between consecutive remote requests, in milliseconds.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 100;

/// Attempts per remote call, including the first.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Pause between attempts of a failed remote call, in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Options for syncing one repository.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Items per listing page.
    pub per_page: u8,
    /// Pause between pages and between pull requests.
    pub request_delay: Duration,
    /// Retry policy for every remote read.
    pub retry: RetryPolicy,
    /// Fetch a pull request individually when the listing lacks line counts.
    pub fetch_details: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PAGE_SIZE,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            retry: RetryPolicy::default(),
            fetch_details: true,
        }
    }
}

/// Result of a repository sync.
#[derive(Debug, Default)]
pub struct SyncResult {
    /// Pull request listing pages fetched.
    pub pages: u32,
    /// Pull requests written during pagination.
    pub pull_requests: usize,
    /// Pull requests whose reviews and comments synced cleanly.
    pub activity_synced: usize,
    /// Reviews written.
    pub reviews: usize,
    /// Comments written, line and conversation comments together.
    pub comments: usize,
    /// Conversation comments skipped because the pull request author wrote them.
    pub skipped_comments: usize,
    /// Per pull request failures (non-fatal).
    pub errors: Vec<String>,
    /// Watermark stored at the end of the run, if it moved.
    pub watermark: Option<DateTime<Utc>>,
}

impl SyncResult {
    /// Whether every pull request's activity synced.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of a size backfill.
#[derive(Debug, Default)]
pub struct BackfillResult {
    /// Pull requests found without line counts.
    pub checked: usize,
    /// Pull requests that now have a size.
    pub updated: usize,
    /// Pull requests the platform still reported without counts.
    pub still_missing: usize,
    /// Per pull request failures (non-fatal).
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_options_default() {
        let options = SyncOptions::default();
        assert_eq!(options.per_page, 100);
        assert_eq!(options.request_delay, Duration::from_millis(100));
        assert_eq!(options.retry.max_attempts, 3);
        assert_eq!(options.retry.delay, Duration::from_secs(1));
        assert!(options.fetch_details);
    }

    #[test]
    fn test_sync_result_is_clean() {
        let mut result = SyncResult::default();
        assert!(result.is_clean());
        result.errors.push("#7: boom".to_string());
        assert!(!result.is_clean());
    }
}

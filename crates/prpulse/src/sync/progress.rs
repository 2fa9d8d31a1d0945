//! Progress reporting for sync operations.

use chrono::{DateTime, Utc};

/// Progress events emitted while syncing a repository.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Looking up the repository and its watermark.
    ResolvingRepository { owner: String, name: String },

    /// The repository was unknown locally and has been fetched and stored.
    RepositoryCreated { owner: String, name: String },

    /// The repository is resolved.
    RepositoryResolved {
        owner: String,
        name: String,
        /// Stored watermark; `None` on a first sync.
        last_sync: Option<DateTime<Utc>>,
    },

    /// Requesting a page of pull requests.
    FetchingPage {
        /// Page number (1-indexed).
        page: u32,
    },

    /// Fetched a page of pull requests.
    FetchedPage {
        page: u32,
        /// Items on the page.
        count: usize,
        /// Items newer than the watermark.
        kept: usize,
    },

    /// A pull request at or before the watermark ended pagination.
    ReachedWatermark { page: u32, number: i32 },

    /// A pull request was written.
    PullRequestSaved { number: i32, title: String },

    /// A pull request listed without line counts could not be fetched individually.
    DetailFetchFailed { number: i32, error: String },

    /// Starting the review and comment pass.
    SyncingActivity {
        /// Pull requests to visit.
        total: usize,
    },

    /// Reviews and comments of one pull request were written.
    ActivitySynced {
        number: i32,
        reviews: usize,
        comments: usize,
        /// Author's own conversation comments that were skipped.
        skipped: usize,
    },

    /// Reviews or comments of one pull request failed; the run continues.
    ActivityError { number: i32, error: String },

    /// A remote call failed and will be retried.
    Retrying {
        /// What was being attempted.
        operation: String,
        /// Failed attempt number (1-indexed).
        attempt: u32,
        /// Pause before the next attempt.
        delay_ms: u64,
        error: String,
    },

    /// The stored watermark moved forward.
    WatermarkAdvanced { to: DateTime<Utc> },

    /// The stored watermark was already at or past the candidate.
    WatermarkUnchanged { candidate: DateTime<Utc> },

    /// Starting a size backfill.
    BackfillStarted {
        /// Pull requests missing line counts.
        total: usize,
    },

    /// A pull request's size was filled in.
    SizeBackfilled {
        owner: String,
        name: String,
        number: i32,
        size: i32,
    },

    /// A pull request's size could not be filled in.
    BackfillError {
        owner: String,
        name: String,
        number: i32,
        error: String,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_with_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(Some(&callback), SyncProgress::FetchingPage { page: 1 });
        emit(
            Some(&callback),
            SyncProgress::FetchedPage {
                page: 1,
                count: 100,
                kept: 40,
            },
        );

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_emit_without_callback() {
        emit(None, SyncProgress::SyncingActivity { total: 3 });
    }

    #[test]
    fn test_sync_progress_activity_error_debug() {
        let event = SyncProgress::ActivityError {
            number: 42,
            error: "API rate limited".to_string(),
        };

        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("ActivityError"));
        assert!(debug_str.contains("42"));
        assert!(debug_str.contains("API rate limited"));
    }
}

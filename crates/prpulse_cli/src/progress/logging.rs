use prpulse::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::ResolvingRepository { owner, name } => {
                tracing::debug!(repo = %format!("{}/{}", owner, name), "Resolving repository");
            }

            SyncProgress::RepositoryCreated { owner, name } => {
                tracing::info!(repo = %format!("{}/{}", owner, name), "Tracking new repository");
            }

            SyncProgress::RepositoryResolved {
                owner,
                name,
                last_sync,
            } => match last_sync {
                Some(last_sync) => {
                    tracing::info!(repo = %format!("{}/{}", owner, name), last_sync = %last_sync, "Resuming from last sync");
                }
                None => {
                    tracing::info!(repo = %format!("{}/{}", owner, name), "First sync, fetching full history");
                }
            },

            SyncProgress::FetchingPage { page } => {
                tracing::debug!(page, "Fetching pull request page");
            }

            SyncProgress::FetchedPage { page, count, kept } => {
                tracing::debug!(page, count, kept, "Fetched page");
            }

            SyncProgress::ReachedWatermark { page, number } => {
                tracing::info!(page, number, "Reached already synced pull requests");
            }

            SyncProgress::PullRequestSaved { number, title } => {
                tracing::debug!(number, title = %title, "Saved pull request");
            }

            SyncProgress::DetailFetchFailed { number, error } => {
                tracing::warn!(number, error = %error, "Saved pull request without size");
            }

            SyncProgress::SyncingActivity { total } => {
                tracing::info!(total, "Syncing reviews and comments");
            }

            SyncProgress::ActivitySynced {
                number,
                reviews,
                comments,
                skipped,
            } => {
                tracing::info!(number, reviews, comments, skipped, "Synced pull request activity");
            }

            SyncProgress::ActivityError { number, error } => {
                tracing::error!(number, error = %error, "Failed to sync pull request activity");
            }

            SyncProgress::Retrying {
                operation,
                attempt,
                delay_ms,
                error,
            } => {
                tracing::warn!(operation = %operation, attempt, delay_ms, error = %error, "Retrying");
            }

            SyncProgress::WatermarkAdvanced { to } => {
                tracing::info!(last_sync = %to, "Watermark advanced");
            }

            SyncProgress::WatermarkUnchanged { candidate } => {
                tracing::debug!(candidate = %candidate, "Watermark unchanged");
            }

            SyncProgress::BackfillStarted { total } => {
                tracing::info!(total, "Backfilling pull request sizes");
            }

            SyncProgress::SizeBackfilled {
                owner,
                name,
                number,
                size,
            } => {
                tracing::info!(repo = %format!("{}/{}", owner, name), number, size, "Backfilled size");
            }

            SyncProgress::BackfillError {
                owner,
                name,
                number,
                error,
            } => {
                tracing::warn!(repo = %format!("{}/{}", owner, name), number, error = %error, "Failed to backfill size");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::entity::repository;
use crate::platform::{PlatformClient, PlatformPullRequest};
use crate::retry::execute_with_retry;
use crate::sync::errors::Result;
use crate::sync::progress::{ProgressCallback, SyncProgress, emit};
use crate::sync::types::SyncOptions;

use super::fetch::pace;
use super::pull_request::materialize_pull_request;

/// What a walk over the pull request listing did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaginationOutcome {
    /// Pages requested, including a final empty one.
    pub pages: u32,
    /// Pull requests written.
    pub materialized: usize,
    /// Whether the walk ended on an item at or before the watermark.
    pub reached_watermark: bool,
}

/// Walk the pull request listing newest-first and write everything updated
/// after `watermark`.
///
/// The walk ends at an empty page or at the first item whose `updated_at` is
/// at or before the watermark; nothing after that item is looked at, on the
/// same page or later ones. Page requests are retried and paced. A failure
/// writing a pull request aborts the walk.
pub async fn fetch_new_pull_requests<C>(
    client: &C,
    db: &DatabaseConnection,
    repository: &repository::Model,
    watermark: DateTime<Utc>,
    options: &SyncOptions,
    now: DateTime<Utc>,
    on_progress: Option<&ProgressCallback>,
) -> Result<PaginationOutcome>
where
    C: PlatformClient + ?Sized,
{
    let per_page = options.per_page.max(1);
    let mut outcome = PaginationOutcome::default();
    let mut page = 1u32;

    loop {
        if page > 1 {
            pace(options.request_delay).await;
        }

        emit(on_progress, SyncProgress::FetchingPage { page });
        let items = execute_with_retry(
            &options.retry,
            || client.list_pull_requests(&repository.owner, &repository.name, page, per_page),
            "list pull requests",
            on_progress,
        )
        .await?;
        outcome.pages += 1;

        if items.is_empty() {
            tracing::debug!(repo = %repository.full_name(), page, "Pull request listing exhausted");
            break;
        }

        let count = items.len();
        let mut kept = 0usize;
        for item in items {
            if item.updated_at <= watermark {
                outcome.reached_watermark = true;
                tracing::debug!(
                    page,
                    number = item.number,
                    updated_at = %item.updated_at,
                    "Reached watermark"
                );
                emit(
                    on_progress,
                    SyncProgress::ReachedWatermark {
                        page,
                        number: item.number,
                    },
                );
                break;
            }

            let record = with_details(client, repository, item, options, on_progress).await;
            let stored = materialize_pull_request(db, repository.id, &record, now).await?;
            kept += 1;
            outcome.materialized += 1;
            emit(
                on_progress,
                SyncProgress::PullRequestSaved {
                    number: stored.number,
                    title: stored.title,
                },
            );
        }

        tracing::info!(repo = %repository.full_name(), page, count, kept, "Fetched pull request page");
        emit(on_progress, SyncProgress::FetchedPage { page, count, kept });

        if outcome.reached_watermark {
            break;
        }
        page += 1;
    }

    Ok(outcome)
}

/// Swap a listed pull request for its individual record when the listing
/// lacked line counts.
///
/// A failed fetch keeps the listed record; the size can be backfilled later.
async fn with_details<C>(
    client: &C,
    repository: &repository::Model,
    listed: PlatformPullRequest,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> PlatformPullRequest
where
    C: PlatformClient + ?Sized,
{
    if !options.fetch_details || listed.has_size() {
        return listed;
    }

    pace(options.request_delay).await;
    let fetched = execute_with_retry(
        &options.retry,
        || client.get_pull_request(&repository.owner, &repository.name, listed.number),
        "get pull request",
        on_progress,
    )
    .await;

    match fetched {
        Ok(detailed) => detailed,
        Err(e) => {
            tracing::warn!(number = listed.number, error = %e, "Could not fetch pull request details");
            emit(
                on_progress,
                SyncProgress::DetailFetchFailed {
                    number: listed.number,
                    error: e.to_string(),
                },
            );
            listed
        }
    }
}

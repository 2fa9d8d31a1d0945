//! Repository sync engine.
//!
//! A run resolves the repository and its watermark, walks the pull request
//! listing newest-first down to the watermark, then revisits every pull
//! request updated since the watermark for its reviews and comments. The
//! watermark moves forward at the end of a run that did not abort.
//!
//! All remote reads except repository resolution are retried, and
//! consecutive remote calls are separated by `SyncOptions::request_delay`.
//! Work is strictly sequential.

mod backfill;
mod fetch;
mod pagination;
mod pull_request;
mod review;
mod watermark;

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;

use super::errors::Result;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{SyncOptions, SyncResult};
use crate::platform::PlatformClient;
use crate::store;

pub use backfill::backfill_sizes;
pub use pagination::{PaginationOutcome, fetch_new_pull_requests};
pub use pull_request::materialize_pull_request;
pub use review::{
    ActivityStats, CommentStats, materialize_comments, materialize_reviews,
    sync_pull_request_activity,
};
pub use watermark::{resolve_repository, watermark_of};

/// Sync one repository's pull requests, reviews and comments.
///
/// A failure in one pull request's review or comment pass is recorded in the
/// result and does not stop the run; the stored watermark is then kept below
/// that pull request's `updated_at` so the next run revisits it.
///
/// # Errors
/// Fails if the repository cannot be resolved, a listing page cannot be
/// fetched after retries, or a pull request cannot be written. The stored
/// watermark is untouched in that case.
pub async fn sync_repository<C>(
    client: &C,
    db: &DatabaseConnection,
    owner: &str,
    name: &str,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncResult>
where
    C: PlatformClient + ?Sized,
{
    let started_at = Utc::now();
    let repository = resolve_repository(client, db, owner, name, started_at, on_progress).await?;
    let watermark = watermark_of(&repository);
    let full_name = repository.full_name();

    tracing::info!(repo = %full_name, watermark = %watermark, "Starting sync");

    let mut result = SyncResult::default();

    let outcome = fetch_new_pull_requests(
        client,
        db,
        &repository,
        watermark,
        options,
        started_at,
        on_progress,
    )
    .await?;
    result.pages = outcome.pages;
    result.pull_requests = outcome.materialized;

    let affected = store::find_pull_requests_updated_since(db, repository.id, watermark).await?;
    tracing::info!(repo = %full_name, count = affected.len(), "Syncing reviews and comments");
    emit(
        on_progress,
        SyncProgress::SyncingActivity {
            total: affected.len(),
        },
    );

    let mut oldest_failure = None;
    for pull_request in &affected {
        fetch::pace(options.request_delay).await;

        match sync_pull_request_activity(
            client,
            db,
            &repository,
            pull_request,
            options,
            started_at,
            on_progress,
        )
        .await
        {
            Ok(stats) => {
                result.activity_synced += 1;
                result.reviews += stats.reviews;
                result.comments += stats.comments;
                result.skipped_comments += stats.skipped;
                emit(
                    on_progress,
                    SyncProgress::ActivitySynced {
                        number: pull_request.number,
                        reviews: stats.reviews,
                        comments: stats.comments,
                        skipped: stats.skipped,
                    },
                );
            }
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(
                    repo = %full_name,
                    number = pull_request.number,
                    error = %error,
                    "Review and comment sync failed"
                );
                result
                    .errors
                    .push(format!("#{}: {}", pull_request.number, error));
                emit(
                    on_progress,
                    SyncProgress::ActivityError {
                        number: pull_request.number,
                        error,
                    },
                );

                let updated_at = pull_request.updated_at.to_utc();
                oldest_failure = Some(match oldest_failure {
                    Some(oldest) if oldest < updated_at => oldest,
                    _ => updated_at,
                });
            }
        }
    }

    let candidate = match oldest_failure {
        Some(oldest) => started_at.min(oldest - Duration::seconds(1)),
        None => started_at,
    };

    if store::advance_last_sync(db, repository.id, candidate).await? {
        tracing::info!(repo = %full_name, watermark = %candidate, "Watermark advanced");
        result.watermark = Some(candidate);
        emit(on_progress, SyncProgress::WatermarkAdvanced { to: candidate });
    } else {
        tracing::info!(repo = %full_name, candidate = %candidate, "Watermark unchanged");
        emit(on_progress, SyncProgress::WatermarkUnchanged { candidate });
    }

    tracing::info!(
        repo = %full_name,
        pages = result.pages,
        pull_requests = result.pull_requests,
        reviews = result.reviews,
        comments = result.comments,
        errors = result.errors.len(),
        "Sync complete"
    );

    Ok(result)
}

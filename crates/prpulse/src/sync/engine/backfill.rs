use sea_orm::DatabaseConnection;

use crate::platform::PlatformClient;
use crate::retry::execute_with_retry;
use crate::store;
use crate::sync::errors::Result;
use crate::sync::progress::{ProgressCallback, SyncProgress, emit};
use crate::sync::types::{BackfillResult, SyncOptions};

use super::fetch::pace;

/// Fill in line counts for stored pull requests that lack them.
///
/// Each pull request is fetched individually. A failed fetch is recorded and
/// skipped; a datastore failure aborts the backfill.
pub async fn backfill_sizes<C>(
    client: &C,
    db: &DatabaseConnection,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<BackfillResult>
where
    C: PlatformClient + ?Sized,
{
    let missing = store::find_pull_requests_missing_size(db).await?;
    let mut result = BackfillResult {
        checked: missing.len(),
        ..Default::default()
    };

    tracing::info!(total = missing.len(), "Backfilling pull request sizes");
    emit(
        on_progress,
        SyncProgress::BackfillStarted {
            total: missing.len(),
        },
    );

    for (index, (pull_request, repository)) in missing.into_iter().enumerate() {
        let Some(repository) = repository else {
            result
                .errors
                .push(format!("pull request {}: repository missing", pull_request.id));
            continue;
        };

        if index > 0 {
            pace(options.request_delay).await;
        }

        let fetched = execute_with_retry(
            &options.retry,
            || client.get_pull_request(&repository.owner, &repository.name, pull_request.number),
            "get pull request",
            on_progress,
        )
        .await;

        match fetched {
            Ok(detail) => match (detail.additions, detail.deletions) {
                (Some(additions), Some(deletions)) => {
                    store::update_pull_request_size(db, pull_request.id, additions, deletions)
                        .await?;
                    result.updated += 1;
                    emit(
                        on_progress,
                        SyncProgress::SizeBackfilled {
                            owner: repository.owner.clone(),
                            name: repository.name.clone(),
                            number: pull_request.number,
                            size: additions.saturating_add(deletions),
                        },
                    );
                }
                _ => {
                    tracing::debug!(number = pull_request.number, "Platform reported no line counts");
                    result.still_missing += 1;
                }
            },
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(
                    repo = %repository.full_name(),
                    number = pull_request.number,
                    error = %error,
                    "Size backfill failed"
                );
                result.errors.push(format!(
                    "{}#{}: {}",
                    repository.full_name(),
                    pull_request.number,
                    error
                ));
                emit(
                    on_progress,
                    SyncProgress::BackfillError {
                        owner: repository.owner.clone(),
                        name: repository.name.clone(),
                        number: pull_request.number,
                        error,
                    },
                );
            }
        }
    }

    Ok(result)
}

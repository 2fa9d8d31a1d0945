use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::entity::repository;
use crate::platform::PlatformClient;
use crate::store::{self, params};
use crate::sync::errors::{Result, SyncError};
use crate::sync::progress::{ProgressCallback, SyncProgress, emit};

/// Find the repository row for `owner/name`, creating it on first sight.
///
/// An unknown repository is fetched from the platform once, without retry,
/// and stored with no watermark. Any failure here aborts the run.
pub async fn resolve_repository<C>(
    client: &C,
    db: &DatabaseConnection,
    owner: &str,
    name: &str,
    now: DateTime<Utc>,
    on_progress: Option<&ProgressCallback>,
) -> Result<repository::Model>
where
    C: PlatformClient + ?Sized,
{
    emit(
        on_progress,
        SyncProgress::ResolvingRepository {
            owner: owner.to_string(),
            name: name.to_string(),
        },
    );

    let repository = match store::find_repository(db, owner, name).await? {
        Some(existing) => existing,
        None => {
            let remote = client
                .get_repo(owner, name)
                .await
                .map_err(|e| SyncError::repository_resolution(owner, name, e))?;
            let created = store::upsert(db, params::repository(&remote, now)).await?;

            tracing::info!(repo = %remote.full_name(), github_id = remote.github_id, "Repository created");
            emit(
                on_progress,
                SyncProgress::RepositoryCreated {
                    owner: created.owner.clone(),
                    name: created.name.clone(),
                },
            );
            created
        }
    };

    emit(
        on_progress,
        SyncProgress::RepositoryResolved {
            owner: repository.owner.clone(),
            name: repository.name.clone(),
            last_sync: repository.last_sync.map(|t| t.to_utc()),
        },
    );

    Ok(repository)
}

/// The instant at or before which activity is already synced.
///
/// A repository that was never synced starts from the Unix epoch, which
/// admits its full history.
pub fn watermark_of(repository: &repository::Model) -> DateTime<Utc> {
    repository
        .last_sync
        .map(|t| t.to_utc())
        .unwrap_or(DateTime::UNIX_EPOCH)
}

use thiserror::Error;

use crate::platform::PlatformError;
use crate::store::StoreError;

/// Errors that abort a sync run.
///
/// Failures confined to one pull request's reviews or comments are not
/// errors at this level; they are collected in the run's result instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The repository could not be found locally or fetched remotely.
    #[error("Could not resolve repository {owner}/{name}: {source}")]
    RepositoryResolution {
        owner: String,
        name: String,
        #[source]
        source: PlatformError,
    },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    pub fn repository_resolution(
        owner: impl Into<String>,
        name: impl Into<String>,
        source: PlatformError,
    ) -> Self {
        Self::RepositoryResolution {
            owner: owner.into(),
            name: name.into(),
            source,
        }
    }
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

//! Incremental pull request sync.
//!
//! # Module Structure
//!
//! - [`types`] - `SyncOptions`, `SyncResult`, `BackfillResult`, constants
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`engine`] - `sync_repository()` and the stages it is built from
//!
//! # Example
//!
//! ```ignore
//! use prpulse::github::GitHubClient;
//! use prpulse::sync::{SyncOptions, sync_repository};
//!
//! async fn sync(db: &sea_orm::DatabaseConnection) -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHubClient::new("ghp_...")?;
//!     let result = sync_repository(&client, db, "acme", "widgets", &SyncOptions::default(), None).await?;
//!     println!("Synced {} pull requests", result.pull_requests);
//!     Ok(())
//! }
//! ```

pub mod engine;
mod errors;
mod progress;
mod types;

pub use errors::{Result, SyncError};

pub use types::{BackfillResult, SyncOptions, SyncResult};

pub use types::{
    DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_DELAY_MS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS,
};

pub use progress::{ProgressCallback, SyncProgress, emit};

pub use engine::{backfill_sizes, sync_repository};

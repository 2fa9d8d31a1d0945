//! prpulse - incremental pull request activity sync.
//!
//! This library mirrors a GitHub repository's pull requests, reviews and
//! comments into a relational store, one repository at a time, picking up
//! where the previous run left off.
//!
//! # Features
//!
//! - `github` - The octocrab-backed [`github::GitHubClient`].
//! - `migrate` - Database migrations and [`connect_and_migrate`].
//! - `sqlite` / `postgres` - Database backends.
//!
//! # Example
//!
//! ```ignore
//! use prpulse::github::GitHubClient;
//! use prpulse::sync::{SyncOptions, sync_repository};
//!
//! let db = prpulse::connect_and_migrate("sqlite://prpulse.db?mode=rwc").await?;
//! let client = GitHubClient::new(&token)?;
//! let result = sync_repository(&client, &db, "acme", "widgets", &SyncOptions::default(), None).await?;
//! println!("{} pull requests, {} reviews", result.pull_requests, result.reviews);
//! ```

pub mod db;
pub mod entity;
pub mod platform;
pub mod retry;
pub mod store;
pub mod sync;

#[cfg(feature = "github")]
pub mod github;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use platform::{
    PlatformAssignment, PlatformClient, PlatformComment, PlatformError, PlatformLabel,
    PlatformPullRequest, PlatformRepo, PlatformReview, PlatformUser,
};
pub use retry::{RetryPolicy, execute_with_retry};
pub use store::StoreError;
pub use sync::{SyncError, SyncOptions, SyncResult};

//! GitHub REST adapter.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Raw payload shapes as returned by the REST API
//! - [`convert`] - Parsing raw payloads into platform records
//! - [`client`] - `GitHubClient`, the `PlatformClient` implementation
//!
//! ```ignore
//! use prpulse::github::GitHubClient;
//! use prpulse::sync::{SyncOptions, sync_repository};
//!
//! let client = GitHubClient::new(&token)?;
//! let result = sync_repository(&client, &db, "acme", "widgets", &SyncOptions::default(), None).await?;
//! ```

mod client;
mod convert;
mod error;
mod types;

pub use client::GitHubClient;
pub use convert::{
    parse_issue_comment, parse_label, parse_pull_request, parse_repo, parse_review,
    parse_review_comment, parse_user,
};
pub use error::GitHubError;
pub use types::{
    RawIssueComment, RawLabel, RawPullRequest, RawRef, RawRepo, RawReview, RawReviewComment,
    RawUser,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entity::pull_request_state::PullRequestState;
use crate::entity::review_state::ReviewState;

use super::errors::Result;

/// A repository as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRepo {
    pub github_id: i64,
    pub owner: String,
    pub name: String,
    /// Canonical web URL.
    pub url: String,
}

impl PlatformRepo {
    /// Compute the full name (owner/name).
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// A platform account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformUser {
    pub github_id: i64,
    pub login: String,
    pub avatar_url: Option<String>,
    /// Profile page URL.
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLabel {
    pub github_id: i64,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

/// A user attached to a pull request, with when the attachment happened.
///
/// `at` is already defaulted at the parsing boundary when the payload
/// does not carry a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformAssignment {
    pub user: PlatformUser,
    pub at: DateTime<Utc>,
}

/// A pull request, normalized at the ingestion boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPullRequest {
    pub github_id: i64,
    pub number: i32,
    pub title: String,
    pub state: PullRequestState,
    /// Canonical web URL.
    pub url: String,
    pub head_ref_name: String,
    pub base_ref_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Absent from list responses; present when fetched individually.
    pub additions: Option<i32>,
    pub deletions: Option<i32>,
    pub author: Option<PlatformUser>,
    pub labels: Vec<PlatformLabel>,
    pub assignees: Vec<PlatformAssignment>,
    pub requested_reviewers: Vec<PlatformAssignment>,
}

impl PlatformPullRequest {
    /// `additions + deletions`, when both are known.
    pub fn size(&self) -> Option<i32> {
        match (self.additions, self.deletions) {
            (Some(additions), Some(deletions)) => Some(additions.saturating_add(deletions)),
            _ => None,
        }
    }

    /// Whole seconds from creation to merge; `None` unless merged.
    pub fn lead_time_seconds(&self) -> Option<i64> {
        self.merged_at
            .map(|merged_at| (merged_at - self.created_at).num_seconds())
    }

    /// Whether the payload carried line counts.
    pub fn has_size(&self) -> bool {
        self.size().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformReview {
    pub github_id: i64,
    pub user: Option<PlatformUser>,
    pub state: ReviewState,
    pub body: Option<String>,
    /// `None` for pending reviews.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A line comment or a conversation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformComment {
    pub github_id: i64,
    pub user: Option<PlatformUser>,
    pub body: String,
    /// Line comments only.
    pub file_path: Option<String>,
    /// Current line, falling back to the original line once the diff moved on.
    pub line_number: Option<i32>,
    /// Remote ID of the parent review, line comments only.
    pub review_github_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-only access to a source-control host.
///
/// Listing methods take a 1-indexed `page`; an empty or short page means the
/// listing is exhausted. Implementations must not retry on their own.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Fetch canonical repository metadata.
    async fn get_repo(&self, owner: &str, name: &str) -> Result<PlatformRepo>;

    /// List pull requests in every state, most recently updated first.
    async fn list_pull_requests(
        &self,
        owner: &str,
        name: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<PlatformPullRequest>>;

    /// Fetch a single pull request, including line counts.
    async fn get_pull_request(
        &self,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<PlatformPullRequest>;

    async fn list_reviews(
        &self,
        owner: &str,
        name: &str,
        number: i32,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<PlatformReview>>;

    /// List comments anchored to lines of the diff.
    async fn list_review_comments(
        &self,
        owner: &str,
        name: &str,
        number: i32,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<PlatformComment>>;

    /// List comments on the pull request's conversation thread.
    async fn list_issue_comments(
        &self,
        owner: &str,
        name: &str,
        number: i32,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<PlatformComment>>;
}

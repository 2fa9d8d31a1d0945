//! Raw GitHub REST payloads.
//!
//! Only the fields the sync reads are declared; everything else in the
//! response is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRepo {
    pub id: i64,
    pub name: String,
    pub owner: RawUser,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A branch reference (`head` or `base`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPullRequest {
    pub id: i64,
    pub number: i32,
    pub title: String,
    /// `open` or `closed`.
    pub state: String,
    pub html_url: String,
    pub head: RawRef,
    pub base: RawRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Only present on the single pull request endpoint.
    #[serde(default)]
    pub additions: Option<i32>,
    #[serde(default)]
    pub deletions: Option<i32>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    #[serde(default)]
    pub assignee: Option<RawUser>,
    #[serde(default)]
    pub assignees: Option<Vec<RawUser>>,
    #[serde(default)]
    pub requested_reviewers: Vec<RawUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    pub id: i64,
    #[serde(default)]
    pub user: Option<RawUser>,
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A comment on a line of the diff.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReviewComment {
    pub id: i64,
    #[serde(default)]
    pub user: Option<RawUser>,
    pub body: String,
    #[serde(default)]
    pub path: Option<String>,
    /// `None` once the line is outdated.
    #[serde(default)]
    pub line: Option<i32>,
    #[serde(default)]
    pub original_line: Option<i32>,
    #[serde(default)]
    pub pull_request_review_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment on the pull request's conversation thread.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssueComment {
    pub id: i64,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string for listing endpoints.
#[derive(Debug, Serialize)]
pub(super) struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<&'static str>,
    per_page: u8,
    page: u32,
}

impl ListParams {
    /// Pull requests in every state, most recently updated first.
    pub(super) fn pulls(page: u32, per_page: u8) -> Self {
        Self {
            state: Some("all"),
            sort: Some("updated"),
            direction: Some("desc"),
            per_page,
            page,
        }
    }

    pub(super) fn page(page: u32, per_page: u8) -> Self {
        Self {
            state: None,
            sort: None,
            direction: None,
            per_page,
            page,
        }
    }
}

//! GitHub API client.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use octocrab::Octocrab;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::convert::{
    parse_issue_comment, parse_pull_request, parse_repo, parse_review, parse_review_comment,
};
use super::error::GitHubError;
use super::types::{
    ListParams, RawIssueComment, RawPullRequest, RawRepo, RawReview, RawReviewComment,
};
use crate::platform::{
    self, PlatformClient, PlatformComment, PlatformPullRequest, PlatformRepo, PlatformReview,
};

/// Create an authenticated Octocrab instance from a GitHub token.
fn create_client(token: &str) -> Result<Octocrab, GitHubError> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(GitHubError::Api)
}

/// GitHub API client implementing the PlatformClient trait.
///
/// Requests are issued once; retrying is left to the caller.
#[derive(Clone)]
pub struct GitHubClient {
    inner: Arc<Octocrab>,
}

impl GitHubClient {
    /// Create a new GitHub client from an authentication token.
    pub fn new(token: &str) -> Result<Self, GitHubError> {
        Ok(Self {
            inner: Arc::new(create_client(token)?),
        })
    }

    async fn get<R, P>(&self, route: &str, params: Option<&P>) -> Result<R, GitHubError>
    where
        R: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        tracing::debug!(route, "GitHub request");
        self.inner
            .get(route, params)
            .await
            .map_err(|e| GitHubError::from_request(e, route))
    }
}

#[async_trait]
impl PlatformClient for GitHubClient {
    async fn get_repo(&self, owner: &str, name: &str) -> platform::Result<PlatformRepo> {
        let raw: RawRepo = self
            .get(&format!("/repos/{owner}/{name}"), None::<&()>)
            .await?;
        Ok(parse_repo(raw))
    }

    async fn list_pull_requests(
        &self,
        owner: &str,
        name: &str,
        page: u32,
        per_page: u8,
    ) -> platform::Result<Vec<PlatformPullRequest>> {
        let raw: Vec<RawPullRequest> = self
            .get(
                &format!("/repos/{owner}/{name}/pulls"),
                Some(&ListParams::pulls(page, per_page)),
            )
            .await?;
        let now = Utc::now();
        raw.into_iter()
            .map(|pr| parse_pull_request(pr, now))
            .collect()
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        name: &str,
        number: i32,
    ) -> platform::Result<PlatformPullRequest> {
        let raw: RawPullRequest = self
            .get(&format!("/repos/{owner}/{name}/pulls/{number}"), None::<&()>)
            .await?;
        parse_pull_request(raw, Utc::now())
    }

    async fn list_reviews(
        &self,
        owner: &str,
        name: &str,
        number: i32,
        page: u32,
        per_page: u8,
    ) -> platform::Result<Vec<PlatformReview>> {
        let raw: Vec<RawReview> = self
            .get(
                &format!("/repos/{owner}/{name}/pulls/{number}/reviews"),
                Some(&ListParams::page(page, per_page)),
            )
            .await?;
        raw.into_iter().map(parse_review).collect()
    }

    async fn list_review_comments(
        &self,
        owner: &str,
        name: &str,
        number: i32,
        page: u32,
        per_page: u8,
    ) -> platform::Result<Vec<PlatformComment>> {
        let raw: Vec<RawReviewComment> = self
            .get(
                &format!("/repos/{owner}/{name}/pulls/{number}/comments"),
                Some(&ListParams::page(page, per_page)),
            )
            .await?;
        Ok(raw.into_iter().map(parse_review_comment).collect())
    }

    async fn list_issue_comments(
        &self,
        owner: &str,
        name: &str,
        number: i32,
        page: u32,
        per_page: u8,
    ) -> platform::Result<Vec<PlatformComment>> {
        let raw: Vec<RawIssueComment> = self
            .get(
                &format!("/repos/{owner}/{name}/issues/{number}/comments"),
                Some(&ListParams::page(page, per_page)),
            )
            .await?;
        Ok(raw.into_iter().map(parse_issue_comment).collect())
    }
}

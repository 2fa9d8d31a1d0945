//! Parsing raw GitHub payloads into platform records.
//!
//! Defaults are applied here so nothing downstream handles missing fields:
//! assignment timestamps fall back to `now`, outdated line comments fall back
//! to their original line, and a missing single `assignees` list falls back to
//! the lone `assignee`.

use chrono::{DateTime, Utc};

use crate::entity::pull_request_state::PullRequestState;
use crate::entity::review_state::ReviewState;
use crate::platform::{
    PlatformAssignment, PlatformComment, PlatformError, PlatformLabel, PlatformPullRequest,
    PlatformRepo, PlatformReview, PlatformUser, Result,
};

use super::types::{
    RawIssueComment, RawLabel, RawPullRequest, RawRepo, RawReview, RawReviewComment, RawUser,
};

pub fn parse_user(raw: RawUser) -> PlatformUser {
    PlatformUser {
        github_id: raw.id,
        login: raw.login,
        avatar_url: raw.avatar_url,
        html_url: raw.html_url,
    }
}

pub fn parse_repo(raw: RawRepo) -> PlatformRepo {
    PlatformRepo {
        github_id: raw.id,
        owner: raw.owner.login,
        name: raw.name,
        url: raw.html_url,
    }
}

pub fn parse_label(raw: RawLabel) -> PlatformLabel {
    PlatformLabel {
        github_id: raw.id,
        name: raw.name,
        color: raw.color.unwrap_or_default(),
        description: raw.description,
    }
}

/// Parse a pull request.
///
/// The REST API reports merged pull requests as `closed` with `merged_at`
/// set, which is exactly the local model.
///
/// # Errors
/// Returns `PlatformError::InvalidPayload` for an unknown state.
pub fn parse_pull_request(raw: RawPullRequest, now: DateTime<Utc>) -> Result<PlatformPullRequest> {
    let state = PullRequestState::from_remote(&raw.state).ok_or_else(|| {
        PlatformError::invalid_payload(format!(
            "pull request #{} has unknown state {:?}",
            raw.number, raw.state
        ))
    })?;

    let assignees = match raw.assignees {
        Some(list) => list,
        None => raw.assignee.into_iter().collect(),
    };
    let assigned = |user: RawUser| PlatformAssignment {
        user: parse_user(user),
        at: now,
    };

    Ok(PlatformPullRequest {
        github_id: raw.id,
        number: raw.number,
        title: raw.title,
        state,
        url: raw.html_url,
        head_ref_name: raw.head.ref_name,
        base_ref_name: raw.base.ref_name,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
        merged_at: raw.merged_at,
        closed_at: raw.closed_at,
        additions: raw.additions,
        deletions: raw.deletions,
        author: raw.user.map(parse_user),
        labels: raw.labels.into_iter().map(parse_label).collect(),
        assignees: assignees.into_iter().map(assigned).collect(),
        requested_reviewers: raw.requested_reviewers.into_iter().map(assigned).collect(),
    })
}

/// # Errors
/// Returns `PlatformError::InvalidPayload` for an unknown review state.
pub fn parse_review(raw: RawReview) -> Result<PlatformReview> {
    let state = ReviewState::from_remote(&raw.state).ok_or_else(|| {
        PlatformError::invalid_payload(format!(
            "review {} has unknown state {:?}",
            raw.id, raw.state
        ))
    })?;

    Ok(PlatformReview {
        github_id: raw.id,
        user: raw.user.map(parse_user),
        state,
        body: raw.body,
        submitted_at: raw.submitted_at,
    })
}

pub fn parse_review_comment(raw: RawReviewComment) -> PlatformComment {
    PlatformComment {
        github_id: raw.id,
        user: raw.user.map(parse_user),
        body: raw.body,
        file_path: raw.path,
        line_number: raw.line.or(raw.original_line),
        review_github_id: raw.pull_request_review_id,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

pub fn parse_issue_comment(raw: RawIssueComment) -> PlatformComment {
    PlatformComment {
        github_id: raw.id,
        user: raw.user.map(parse_user),
        body: raw.body.unwrap_or_default(),
        file_path: None,
        line_number: None,
        review_github_id: None,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap()
    }

    fn user_json(id: i64, login: &str) -> serde_json::Value {
        json!({
            "id": id,
            "login": login,
            "avatar_url": format!("https://avatars.githubusercontent.com/u/{id}"),
            "html_url": format!("https://github.com/{login}"),
            "type": "User"
        })
    }

    fn pull_json() -> serde_json::Value {
        json!({
            "id": 1_900_000_001_i64,
            "number": 42,
            "title": "Speed up parser",
            "state": "closed",
            "html_url": "https://github.com/acme/widgets/pull/42",
            "head": { "ref": "perf", "sha": "abc" },
            "base": { "ref": "main", "sha": "def" },
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-03T00:00:00Z",
            "merged_at": "2024-01-02T12:00:00Z",
            "closed_at": "2024-01-02T12:00:00Z",
            "user": user_json(1, "alice"),
            "labels": [{ "id": 7, "name": "perf", "color": "fbca04", "description": null }],
            "assignee": user_json(2, "bob"),
            "assignees": [user_json(2, "bob"), user_json(3, "carol")],
            "requested_reviewers": [user_json(4, "dave")],
            "draft": false
        })
    }

    #[test]
    fn test_parse_pull_request_list_payload() {
        let raw: RawPullRequest = serde_json::from_value(pull_json()).unwrap();
        let pr = parse_pull_request(raw, now()).unwrap();

        assert_eq!(pr.number, 42);
        assert_eq!(pr.state, PullRequestState::Closed);
        assert_eq!(pr.head_ref_name, "perf");
        assert_eq!(pr.base_ref_name, "main");
        assert_eq!(pr.additions, None);
        assert_eq!(pr.lead_time_seconds(), Some(129_600));
        assert_eq!(pr.author.as_ref().map(|u| u.login.as_str()), Some("alice"));
        assert_eq!(pr.labels[0].color, "fbca04");

        let assignees: Vec<&str> = pr.assignees.iter().map(|a| a.user.login.as_str()).collect();
        assert_eq!(assignees, vec!["bob", "carol"]);
        assert!(pr.assignees.iter().all(|a| a.at == now()));
        assert_eq!(pr.requested_reviewers[0].user.github_id, 4);
        assert_eq!(pr.requested_reviewers[0].at, now());
    }

    #[test]
    fn test_parse_pull_request_detail_carries_counts() {
        let mut payload = pull_json();
        payload["additions"] = json!(120);
        payload["deletions"] = json!(45);
        let raw: RawPullRequest = serde_json::from_value(payload).unwrap();

        let pr = parse_pull_request(raw, now()).unwrap();
        assert_eq!(pr.size(), Some(165));
    }

    #[test]
    fn test_parse_pull_request_single_assignee_fallback() {
        let mut payload = pull_json();
        payload.as_object_mut().unwrap().remove("assignees");
        let raw: RawPullRequest = serde_json::from_value(payload).unwrap();

        let pr = parse_pull_request(raw, now()).unwrap();
        assert_eq!(pr.assignees.len(), 1);
        assert_eq!(pr.assignees[0].user.login, "bob");
    }

    #[test]
    fn test_parse_pull_request_unknown_state() {
        let mut payload = pull_json();
        payload["state"] = json!("draft");
        let raw: RawPullRequest = serde_json::from_value(payload).unwrap();

        let err = parse_pull_request(raw, now()).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidPayload { .. }));
    }

    #[test]
    fn test_parse_review_uppercases_state() {
        let raw: RawReview = serde_json::from_value(json!({
            "id": 80,
            "user": user_json(4, "dave"),
            "state": "changes_requested",
            "body": "Please add tests",
            "submitted_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        let review = parse_review(raw).unwrap();
        assert_eq!(review.state, ReviewState::ChangesRequested);
        assert_eq!(review.user.map(|u| u.login), Some("dave".to_string()));
    }

    #[test]
    fn test_parse_pending_review_without_submission() {
        let raw: RawReview = serde_json::from_value(json!({
            "id": 81,
            "user": null,
            "state": "PENDING",
            "body": ""
        }))
        .unwrap();

        let review = parse_review(raw).unwrap();
        assert_eq!(review.state, ReviewState::Pending);
        assert_eq!(review.submitted_at, None);
        assert_eq!(review.user, None);
    }

    #[test]
    fn test_parse_review_comment_falls_back_to_original_line() {
        let raw: RawReviewComment = serde_json::from_value(json!({
            "id": 900,
            "user": user_json(4, "dave"),
            "body": "nit: rename",
            "path": "src/parser.rs",
            "line": null,
            "original_line": 17,
            "pull_request_review_id": 80,
            "created_at": "2024-01-02T00:00:00Z",
            "updated_at": "2024-01-02T00:05:00Z"
        }))
        .unwrap();

        let comment = parse_review_comment(raw);
        assert_eq!(comment.line_number, Some(17));
        assert_eq!(comment.review_github_id, Some(80));
        assert_eq!(comment.file_path.as_deref(), Some("src/parser.rs"));
    }

    #[test]
    fn test_parse_issue_comment_has_no_location() {
        let raw: RawIssueComment = serde_json::from_value(json!({
            "id": 901,
            "user": user_json(1, "alice"),
            "body": "Thanks for the review!",
            "created_at": "2024-01-02T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        let comment = parse_issue_comment(raw);
        assert_eq!(comment.file_path, None);
        assert_eq!(comment.line_number, None);
        assert_eq!(comment.review_github_id, None);
        assert_eq!(comment.body, "Thanks for the review!");
    }

    #[test]
    fn test_parse_repo_uses_owner_login() {
        let raw: RawRepo = serde_json::from_value(json!({
            "id": 55,
            "name": "widgets",
            "full_name": "acme/widgets",
            "owner": user_json(9, "acme"),
            "html_url": "https://github.com/acme/widgets"
        }))
        .unwrap();

        let repo = parse_repo(raw);
        assert_eq!(repo.full_name(), "acme/widgets");
        assert_eq!(repo.github_id, 55);
    }
}

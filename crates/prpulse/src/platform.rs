//! Platform-agnostic view of the source-control host.
//!
//! The sync engine only talks to a [`PlatformClient`]; payloads are normalized
//! into the `Platform*` records here, so nothing downstream handles raw JSON.

mod errors;
mod types;

pub use errors::{PlatformError, Result, short_error_message};
pub use types::{
    PlatformAssignment, PlatformClient, PlatformComment, PlatformLabel, PlatformPullRequest,
    PlatformRepo, PlatformReview, PlatformUser,
};

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::entity::pull_request_state::PullRequestState;

    use super::*;

    fn pull_request() -> PlatformPullRequest {
        PlatformPullRequest {
            github_id: 1,
            number: 7,
            title: "Add widget".to_string(),
            state: PullRequestState::Closed,
            url: "https://github.com/o/r/pull/7".to_string(),
            head_ref_name: "feature".to_string(),
            base_ref_name: "main".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
            merged_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()),
            closed_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()),
            additions: Some(120),
            deletions: Some(45),
            author: None,
            labels: vec![],
            assignees: vec![],
            requested_reviewers: vec![],
        }
    }

    #[test]
    fn size_is_additions_plus_deletions() {
        assert_eq!(pull_request().size(), Some(165));
    }

    #[test]
    fn size_unknown_without_both_counts() {
        let pr = PlatformPullRequest {
            deletions: None,
            ..pull_request()
        };
        assert_eq!(pr.size(), None);
        assert!(!pr.has_size());
    }

    #[test]
    fn lead_time_counts_seconds_to_merge() {
        assert_eq!(pull_request().lead_time_seconds(), Some(129_600));
    }

    #[test]
    fn lead_time_absent_unless_merged() {
        let pr = PlatformPullRequest {
            merged_at: None,
            ..pull_request()
        };
        assert_eq!(pr.lead_time_seconds(), None);
    }

    #[test]
    fn platform_error_constructors() {
        assert!(
            PlatformError::not_found("o/r")
                .to_string()
                .contains("Not found: o/r")
        );
        assert!(PlatformError::api("boom").to_string().contains("API error"));
        assert!(
            PlatformError::network("reset")
                .to_string()
                .contains("Network error: reset")
        );
    }

    #[test]
    fn short_error_message_keeps_first_line() {
        let err = std::io::Error::other("first line\nsecond line");
        assert_eq!(short_error_message(&err), "first line");
    }
}

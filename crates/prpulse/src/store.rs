//! Persistence for synced activity.
//!
//! Writes go through [`params`] builders, which describe an upsert without
//! touching the database, and the [`upsert`]/[`link`] executors. Reads used
//! by the sync engine and the CLI live alongside.

mod errors;
pub mod params;
mod query;
mod upsert;

pub use errors::{Result, StoreError};
pub use params::{LinkParams, UpsertParams};
pub use query::{
    advance_last_sync, count_comments_by_category, find_pull_requests_missing_size,
    find_pull_requests_updated_since, find_repository, find_review_by_github_id,
    find_unclassified_review_comment_bodies, find_user_by_id, set_pull_request_author,
    update_pull_request_size,
};
pub use upsert::{link, upsert};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_not_found() {
        let err = StoreError::not_found("pull request 42");
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("pull request 42"));
    }

    #[test]
    fn test_store_error_from_db_err() {
        let err: StoreError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod db_tests {
    use chrono::{DateTime, TimeZone, Utc};
    use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

    use crate::connect_and_migrate;
    use crate::entity::comment_type::CommentType;
    use crate::entity::pull_request_state::PullRequestState;
    use crate::entity::review_comment_category::ReviewCommentCategory;
    use crate::entity::{pull_request_label, review_comment};
    use crate::platform::{
        PlatformComment, PlatformLabel, PlatformPullRequest, PlatformRepo, PlatformUser,
    };

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap()
    }

    async fn setup_db() -> DatabaseConnection {
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate")
    }

    fn repo() -> PlatformRepo {
        PlatformRepo {
            github_id: 10,
            owner: "acme".to_string(),
            name: "widgets".to_string(),
            url: "https://github.com/acme/widgets".to_string(),
        }
    }

    fn octocat(login: &str, avatar: &str) -> PlatformUser {
        PlatformUser {
            github_id: 583231,
            login: login.to_string(),
            avatar_url: Some(avatar.to_string()),
            html_url: None,
        }
    }

    fn pr(number: i32, updated_day: u32, counts: Option<(i32, i32)>) -> PlatformPullRequest {
        PlatformPullRequest {
            github_id: 1000 + i64::from(number),
            number,
            title: format!("PR {number}"),
            state: PullRequestState::Open,
            url: format!("https://github.com/acme/widgets/pull/{number}"),
            head_ref_name: "feature".to_string(),
            base_ref_name: "main".to_string(),
            created_at: at(1),
            updated_at: at(updated_day),
            merged_at: None,
            closed_at: None,
            additions: counts.map(|(a, _)| a),
            deletions: counts.map(|(_, d)| d),
            author: None,
            labels: vec![],
            assignees: vec![],
            requested_reviewers: vec![],
        }
    }

    #[tokio::test]
    async fn test_user_upsert_keeps_first_login() {
        let db = setup_db().await;

        let first = upsert(&db, params::user(&octocat("octocat", "a1"), at(1)))
            .await
            .unwrap();
        let second = upsert(&db, params::user(&octocat("renamed", "a2"), at(2)))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.login, "octocat");
        assert_eq!(second.avatar_url.as_deref(), Some("a2"));
        assert_eq!(second.created_at, at(1).fixed_offset());
        assert_eq!(second.updated_at, at(2).fixed_offset());
    }

    #[tokio::test]
    async fn test_pull_request_upsert_preserves_size_when_list_omits_it() {
        let db = setup_db().await;
        let repository = upsert(&db, params::repository(&repo(), at(1))).await.unwrap();

        let detailed = upsert(
            &db,
            params::pull_request(&pr(7, 2, Some((10, 5))), repository.id, at(2)),
        )
        .await
        .unwrap();
        assert_eq!(detailed.size, Some(15));

        let listed = upsert(
            &db,
            params::pull_request(&pr(7, 3, None), repository.id, at(3)),
        )
        .await
        .unwrap();

        assert_eq!(listed.id, detailed.id);
        assert_eq!(listed.size, Some(15));
        assert_eq!(listed.additions, Some(10));
        assert_eq!(listed.updated_at, at(3).fixed_offset());
        assert_eq!(
            crate::entity::pull_request::Entity::find()
                .count(&db)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_link_is_idempotent() {
        let db = setup_db().await;
        let repository = upsert(&db, params::repository(&repo(), at(1))).await.unwrap();
        let pull_request = upsert(
            &db,
            params::pull_request(&pr(1, 2, None), repository.id, at(2)),
        )
        .await
        .unwrap();
        let label = upsert(
            &db,
            params::label(
                &PlatformLabel {
                    github_id: 3,
                    name: "bug".to_string(),
                    color: "d73a4a".to_string(),
                    description: None,
                },
                at(2),
            ),
        )
        .await
        .unwrap();

        let first = link(&db, params::pull_request_label(pull_request.id, label.id, at(2)))
            .await
            .unwrap();
        let second = link(&db, params::pull_request_label(pull_request.id, label.id, at(3)))
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
        let rows = pull_request_label::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].created_at, at(2).fixed_offset());
    }

    #[tokio::test]
    async fn test_advance_last_sync_never_moves_backwards() {
        let db = setup_db().await;
        let repository = upsert(&db, params::repository(&repo(), at(1))).await.unwrap();

        assert!(advance_last_sync(&db, repository.id, at(10)).await.unwrap());
        assert!(!advance_last_sync(&db, repository.id, at(5)).await.unwrap());
        assert!(!advance_last_sync(&db, repository.id, at(10)).await.unwrap());

        let stored = find_repository(&db, "acme", "widgets")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.last_sync, Some(at(10).fixed_offset()));
    }

    #[tokio::test]
    async fn test_find_pull_requests_updated_since_is_inclusive() {
        let db = setup_db().await;
        let repository = upsert(&db, params::repository(&repo(), at(1))).await.unwrap();
        for (number, day) in [(1, 3), (2, 5), (3, 7)] {
            upsert(
                &db,
                params::pull_request(&pr(number, day, None), repository.id, at(8)),
            )
            .await
            .unwrap();
        }

        let found = find_pull_requests_updated_since(&db, repository.id, at(5))
            .await
            .unwrap();
        let numbers: Vec<i32> = found.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_missing_size_and_backfill_update() {
        let db = setup_db().await;
        let repository = upsert(&db, params::repository(&repo(), at(1))).await.unwrap();
        let sized = upsert(
            &db,
            params::pull_request(&pr(1, 2, Some((1, 1))), repository.id, at(2)),
        )
        .await
        .unwrap();
        let unsized_pr = upsert(
            &db,
            params::pull_request(&pr(2, 2, None), repository.id, at(2)),
        )
        .await
        .unwrap();

        let missing = find_pull_requests_missing_size(&db).await.unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].0.id, unsized_pr.id);
        assert_eq!(missing[0].1.as_ref().map(|r| r.id), Some(repository.id));

        update_pull_request_size(&db, unsized_pr.id, 30, 12)
            .await
            .unwrap();
        assert!(find_pull_requests_missing_size(&db).await.unwrap().is_empty());

        let reloaded = crate::entity::pull_request::Entity::find_by_id(unsized_pr.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.size, Some(42));
        assert_ne!(reloaded.id, sized.id);
    }

    #[tokio::test]
    async fn test_count_comments_by_category_includes_unclassified() {
        let db = setup_db().await;
        let repository = upsert(&db, params::repository(&repo(), at(1))).await.unwrap();
        let pull_request = upsert(
            &db,
            params::pull_request(&pr(1, 2, None), repository.id, at(2)),
        )
        .await
        .unwrap();

        for (github_id, category) in [
            (1, Some(ReviewCommentCategory::Style)),
            (2, Some(ReviewCommentCategory::Style)),
            (3, Some(ReviewCommentCategory::Security)),
            (4, None),
        ] {
            let comment = PlatformComment {
                github_id,
                user: None,
                body: "comment".to_string(),
                file_path: None,
                line_number: None,
                review_github_id: None,
                created_at: at(2),
                updated_at: at(2),
            };
            let stored = upsert(
                &db,
                params::review_comment(
                    &comment,
                    pull_request.id,
                    None,
                    None,
                    CommentType::IssueComment,
                    at(2),
                ),
            )
            .await
            .unwrap();
            if let Some(category) = category {
                let mut active: review_comment::ActiveModel = stored.into();
                active.category = Set(Some(category));
                active.update(&db).await.unwrap();
            }
        }

        let mut counts = count_comments_by_category(&db).await.unwrap();
        counts.sort_by_key(|(category, _)| category.map(|c| c.to_string()));
        assert_eq!(
            counts,
            vec![
                (None, 1),
                (Some(ReviewCommentCategory::Security), 1),
                (Some(ReviewCommentCategory::Style), 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_unclassified_bodies_cover_line_comments_only() {
        let db = setup_db().await;
        let repository = upsert(&db, params::repository(&repo(), at(1))).await.unwrap();
        let pull_request = upsert(
            &db,
            params::pull_request(&pr(1, 2, None), repository.id, at(2)),
        )
        .await
        .unwrap();

        for (github_id, body, comment_type, category) in [
            (1, "https://ci.example.com/run/7", CommentType::ReviewComment, None),
            (2, "rename this", CommentType::ReviewComment, None),
            (3, "tidy up", CommentType::ReviewComment, Some(ReviewCommentCategory::Style)),
            (4, "https://example.com", CommentType::IssueComment, None),
        ] {
            let comment = PlatformComment {
                github_id,
                user: None,
                body: body.to_string(),
                file_path: None,
                line_number: None,
                review_github_id: None,
                created_at: at(2),
                updated_at: at(2),
            };
            let stored = upsert(
                &db,
                params::review_comment(&comment, pull_request.id, None, None, comment_type, at(2)),
            )
            .await
            .unwrap();
            if let Some(category) = category {
                let mut active: review_comment::ActiveModel = stored.into();
                active.category = Set(Some(category));
                active.update(&db).await.unwrap();
            }
        }

        let mut bodies = find_unclassified_review_comment_bodies(&db).await.unwrap();
        bodies.sort();
        assert_eq!(bodies, vec!["https://ci.example.com/run/7", "rename this"]);
    }

    #[tokio::test]
    async fn test_set_pull_request_author() {
        let db = setup_db().await;
        let repository = upsert(&db, params::repository(&repo(), at(1))).await.unwrap();
        let pull_request = upsert(
            &db,
            params::pull_request(&pr(1, 2, None), repository.id, at(2)),
        )
        .await
        .unwrap();
        let author = upsert(&db, params::user(&octocat("octocat", "a"), at(2)))
            .await
            .unwrap();

        set_pull_request_author(&db, pull_request.id, author.id)
            .await
            .unwrap();

        let reloaded = crate::entity::pull_request::Entity::find_by_id(pull_request.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.author_id, Some(author.id));
        assert_eq!(
            find_user_by_id(&db, author.id).await.unwrap().map(|u| u.login),
            Some("octocat".to_string())
        );
    }
}

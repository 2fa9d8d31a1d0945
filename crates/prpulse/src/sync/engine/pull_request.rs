use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::entity::pull_request;
use crate::platform::PlatformPullRequest;
use crate::store::{self, Result, link, params, upsert};

/// Write one pull request and everything attached to it.
///
/// Steps run in dependency order so every foreign key exists before it is
/// referenced: the pull request, its author, labels, assignees, then
/// requested reviewers. Each step is an idempotent upsert; an error stops the
/// sequence without undoing earlier steps.
pub async fn materialize_pull_request(
    db: &DatabaseConnection,
    repository_id: Uuid,
    record: &PlatformPullRequest,
    now: DateTime<Utc>,
) -> Result<pull_request::Model> {
    let mut stored = upsert(db, params::pull_request(record, repository_id, now)).await?;

    if let Some(author) = &record.author {
        let user = upsert(db, params::user(author, now)).await?;
        store::set_pull_request_author(db, stored.id, user.id).await?;
        stored.author_id = Some(user.id);
    }

    for label in &record.labels {
        let label = upsert(db, params::label(label, now)).await?;
        link(db, params::pull_request_label(stored.id, label.id, now)).await?;
    }

    for assignee in &record.assignees {
        let user = upsert(db, params::user(&assignee.user, now)).await?;
        link(db, params::pull_request_assignee(stored.id, user.id, assignee.at)).await?;
    }

    for reviewer in &record.requested_reviewers {
        let user = upsert(db, params::user(&reviewer.user, now)).await?;
        link(db, params::pull_request_reviewer(stored.id, user.id, reviewer.at)).await?;
    }

    tracing::debug!(
        number = record.number,
        labels = record.labels.len(),
        assignees = record.assignees.len(),
        reviewers = record.requested_reviewers.len(),
        "Pull request materialized"
    );

    Ok(stored)
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod tests {
    use chrono::TimeZone;
    use sea_orm::{EntityTrait, PaginatorTrait};

    use crate::connect_and_migrate;
    use crate::entity::pull_request_state::PullRequestState;
    use crate::entity::{pull_request_assignee, pull_request_label, pull_request_reviewer, user};
    use crate::platform::{PlatformAssignment, PlatformLabel, PlatformRepo, PlatformUser};

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap()
    }

    fn person(github_id: i64, login: &str) -> PlatformUser {
        PlatformUser {
            github_id,
            login: login.to_string(),
            avatar_url: None,
            html_url: None,
        }
    }

    fn record() -> PlatformPullRequest {
        PlatformPullRequest {
            github_id: 500,
            number: 12,
            title: "Add caching".to_string(),
            state: PullRequestState::Open,
            url: "https://github.com/acme/widgets/pull/12".to_string(),
            head_ref_name: "cache".to_string(),
            base_ref_name: "main".to_string(),
            created_at: at(1),
            updated_at: at(4),
            merged_at: None,
            closed_at: None,
            additions: Some(20),
            deletions: Some(2),
            author: Some(person(1, "alice")),
            labels: vec![PlatformLabel {
                github_id: 77,
                name: "enhancement".to_string(),
                color: "a2eeef".to_string(),
                description: Some("New feature".to_string()),
            }],
            assignees: vec![
                PlatformAssignment {
                    user: person(2, "bob"),
                    at: at(2),
                },
                PlatformAssignment {
                    user: person(3, "carol"),
                    at: at(2),
                },
            ],
            requested_reviewers: vec![PlatformAssignment {
                user: person(2, "bob"),
                at: at(3),
            }],
        }
    }

    async fn setup() -> (DatabaseConnection, Uuid) {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate");
        let repo = PlatformRepo {
            github_id: 9,
            owner: "acme".to_string(),
            name: "widgets".to_string(),
            url: "https://github.com/acme/widgets".to_string(),
        };
        let repository = upsert(&db, params::repository(&repo, at(1))).await.unwrap();
        (db, repository.id)
    }

    #[tokio::test]
    async fn test_materialize_writes_all_attachments() {
        let (db, repository_id) = setup().await;

        let stored = materialize_pull_request(&db, repository_id, &record(), at(5))
            .await
            .unwrap();

        let alice = user::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .find(|u| u.login == "alice")
            .unwrap();
        assert_eq!(stored.author_id, Some(alice.id));
        assert_eq!(stored.size, Some(22));
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(pull_request_label::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(pull_request_assignee::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(pull_request_reviewer::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_materialize_twice_is_idempotent() {
        let (db, repository_id) = setup().await;

        let first = materialize_pull_request(&db, repository_id, &record(), at(5))
            .await
            .unwrap();
        let second = materialize_pull_request(&db, repository_id, &record(), at(6))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.author_id, second.author_id);
        assert_eq!(
            crate::entity::pull_request::Entity::find()
                .count(&db)
                .await
                .unwrap(),
            1
        );
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(pull_request_assignee::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(second.synced_at, at(6).fixed_offset());
    }
}

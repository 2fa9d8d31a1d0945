//! Pure builders mapping platform records onto upsert instructions.
//!
//! Each builder returns the row to insert (the create field set), the conflict
//! clause (match key plus update field set) and a condition that finds the
//! row again afterwards. Nothing here touches the database.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, NotSet, Set};
use uuid::Uuid;

use crate::entity::comment_type::CommentType;
use crate::entity::{
    label, pull_request, pull_request_assignee, pull_request_label, pull_request_reviewer,
    repository, review, review_comment, user,
};
use crate::platform::{
    PlatformComment, PlatformLabel, PlatformPullRequest, PlatformRepo, PlatformReview,
    PlatformUser,
};

/// Insert-or-update instruction for an entity with its own identity.
#[derive(Debug, Clone)]
pub struct UpsertParams<A: ActiveModelTrait> {
    /// Row written when no match exists.
    pub model: A,
    /// Match key and the columns refreshed on a match.
    pub on_conflict: OnConflict,
    /// Finds the stored row by the same match key.
    pub key: Condition,
}

/// Insert-if-absent instruction for a join row.
#[derive(Debug, Clone)]
pub struct LinkParams<A: ActiveModelTrait> {
    pub model: A,
    pub on_conflict: OnConflict,
}

/// Repository, matched on remote ID. A rename refreshes owner, name and URL.
pub fn repository(repo: &PlatformRepo, now: DateTime<Utc>) -> UpsertParams<repository::ActiveModel> {
    use repository::Column;

    let now = now.fixed_offset();
    UpsertParams {
        model: repository::ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(repo.github_id),
            owner: Set(repo.owner.clone()),
            name: Set(repo.name.clone()),
            url: Set(repo.url.clone()),
            last_sync: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        },
        on_conflict: OnConflict::column(Column::GithubId)
            .update_columns([Column::Owner, Column::Name, Column::Url, Column::UpdatedAt])
            .to_owned(),
        key: Condition::all().add(Column::GithubId.eq(repo.github_id)),
    }
}

/// User, matched on remote ID. `login` is written on creation only.
pub fn user(user: &PlatformUser, now: DateTime<Utc>) -> UpsertParams<user::ActiveModel> {
    use user::Column;

    let now = now.fixed_offset();
    UpsertParams {
        model: user::ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(user.github_id),
            login: Set(user.login.clone()),
            avatar_url: Set(user.avatar_url.clone()),
            html_url: Set(user.html_url.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        },
        on_conflict: OnConflict::column(Column::GithubId)
            .update_columns([Column::AvatarUrl, Column::HtmlUrl, Column::UpdatedAt])
            .to_owned(),
        key: Condition::all().add(Column::GithubId.eq(user.github_id)),
    }
}

pub fn label(label: &PlatformLabel, now: DateTime<Utc>) -> UpsertParams<label::ActiveModel> {
    use label::Column;

    let now = now.fixed_offset();
    UpsertParams {
        model: label::ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(label.github_id),
            name: Set(label.name.clone()),
            color: Set(label.color.clone()),
            description: Set(label.description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        },
        on_conflict: OnConflict::column(Column::GithubId)
            .update_columns([
                Column::Name,
                Column::Color,
                Column::Description,
                Column::UpdatedAt,
            ])
            .to_owned(),
        key: Condition::all().add(Column::GithubId.eq(label.github_id)),
    }
}

/// Pull request, matched on (repository, number).
///
/// Remote ID, number, creation time and URL are create-only. The author is
/// attached separately. Line counts are only refreshed when the payload
/// carried them, so a list response never erases a known size.
pub fn pull_request(
    pr: &PlatformPullRequest,
    repository_id: Uuid,
    now: DateTime<Utc>,
) -> UpsertParams<pull_request::ActiveModel> {
    use pull_request::Column;

    let mut update = vec![
        Column::Title,
        Column::State,
        Column::HeadRefName,
        Column::BaseRefName,
        Column::UpdatedAt,
        Column::MergedAt,
        Column::ClosedAt,
        Column::LeadTimeInSeconds,
        Column::SyncedAt,
    ];
    if pr.has_size() {
        update.extend([Column::Additions, Column::Deletions, Column::Size]);
    }

    UpsertParams {
        model: pull_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(pr.github_id),
            repository_id: Set(repository_id),
            number: Set(pr.number),
            title: Set(pr.title.clone()),
            state: Set(pr.state),
            url: Set(pr.url.clone()),
            head_ref_name: Set(pr.head_ref_name.clone()),
            base_ref_name: Set(pr.base_ref_name.clone()),
            author_id: NotSet,
            created_at: Set(pr.created_at.fixed_offset()),
            updated_at: Set(pr.updated_at.fixed_offset()),
            merged_at: Set(pr.merged_at.map(|t| t.fixed_offset())),
            closed_at: Set(pr.closed_at.map(|t| t.fixed_offset())),
            additions: Set(pr.additions),
            deletions: Set(pr.deletions),
            size: Set(pr.size()),
            lead_time_in_seconds: Set(pr.lead_time_seconds()),
            synced_at: Set(now.fixed_offset()),
        },
        on_conflict: OnConflict::columns([Column::RepositoryId, Column::Number])
            .update_columns(update)
            .to_owned(),
        key: Condition::all()
            .add(Column::RepositoryId.eq(repository_id))
            .add(Column::Number.eq(pr.number)),
    }
}

pub fn pull_request_label(
    pull_request_id: Uuid,
    label_id: Uuid,
    now: DateTime<Utc>,
) -> LinkParams<pull_request_label::ActiveModel> {
    use pull_request_label::Column;

    LinkParams {
        model: pull_request_label::ActiveModel {
            pull_request_id: Set(pull_request_id),
            label_id: Set(label_id),
            created_at: Set(now.fixed_offset()),
        },
        on_conflict: OnConflict::columns([Column::PullRequestId, Column::LabelId])
            .do_nothing()
            .to_owned(),
    }
}

pub fn pull_request_assignee(
    pull_request_id: Uuid,
    user_id: Uuid,
    assigned_at: DateTime<Utc>,
) -> LinkParams<pull_request_assignee::ActiveModel> {
    use pull_request_assignee::Column;

    LinkParams {
        model: pull_request_assignee::ActiveModel {
            pull_request_id: Set(pull_request_id),
            user_id: Set(user_id),
            assigned_at: Set(assigned_at.fixed_offset()),
        },
        on_conflict: OnConflict::columns([Column::PullRequestId, Column::UserId])
            .do_nothing()
            .to_owned(),
    }
}

pub fn pull_request_reviewer(
    pull_request_id: Uuid,
    user_id: Uuid,
    requested_at: DateTime<Utc>,
) -> LinkParams<pull_request_reviewer::ActiveModel> {
    use pull_request_reviewer::Column;

    LinkParams {
        model: pull_request_reviewer::ActiveModel {
            pull_request_id: Set(pull_request_id),
            user_id: Set(user_id),
            requested_at: Set(requested_at.fixed_offset()),
        },
        on_conflict: OnConflict::columns([Column::PullRequestId, Column::UserId])
            .do_nothing()
            .to_owned(),
    }
}

/// Review, matched on remote ID. Only the verdict, body and submission time move.
pub fn review(
    review: &PlatformReview,
    pull_request_id: Uuid,
    user_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> UpsertParams<review::ActiveModel> {
    use review::Column;

    let now = now.fixed_offset();
    UpsertParams {
        model: review::ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(review.github_id),
            pull_request_id: Set(pull_request_id),
            user_id: Set(user_id),
            state: Set(review.state),
            body: Set(review.body.clone()),
            submitted_at: Set(review.submitted_at.map(|t| t.fixed_offset())),
            created_at: Set(now),
            updated_at: Set(now),
        },
        on_conflict: OnConflict::column(Column::GithubId)
            .update_columns([
                Column::State,
                Column::Body,
                Column::SubmittedAt,
                Column::UpdatedAt,
            ])
            .to_owned(),
        key: Condition::all().add(Column::GithubId.eq(review.github_id)),
    }
}

/// Review comment, matched on remote ID.
///
/// A resolved parent review is written on update too, which repairs links
/// left empty by an earlier pass; an unresolved one never clears a link.
pub fn review_comment(
    comment: &PlatformComment,
    pull_request_id: Uuid,
    user_id: Option<Uuid>,
    review_id: Option<Uuid>,
    comment_type: CommentType,
    now: DateTime<Utc>,
) -> UpsertParams<review_comment::ActiveModel> {
    use review_comment::Column;

    let mut update = vec![
        Column::Body,
        Column::FilePath,
        Column::LineNumber,
        Column::UpdatedAt,
        Column::LocalUpdatedAt,
    ];
    if review_id.is_some() {
        update.push(Column::ReviewId);
    }

    let now = now.fixed_offset();
    UpsertParams {
        model: review_comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(comment.github_id),
            pull_request_id: Set(pull_request_id),
            review_id: Set(review_id),
            user_id: Set(user_id),
            body: Set(comment.body.clone()),
            file_path: Set(comment.file_path.clone()),
            line_number: Set(comment.line_number),
            comment_type: Set(comment_type),
            category: NotSet,
            created_at: Set(comment.created_at.fixed_offset()),
            updated_at: Set(comment.updated_at.fixed_offset()),
            local_created_at: Set(now),
            local_updated_at: Set(now),
        },
        on_conflict: OnConflict::column(Column::GithubId)
            .update_columns(update)
            .to_owned(),
        key: Condition::all().add(Column::GithubId.eq(comment.github_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, EntityTrait, QueryTrait};

    use crate::entity::pull_request_state::PullRequestState;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn octocat() -> PlatformUser {
        PlatformUser {
            github_id: 583231,
            login: "octocat".to_string(),
            avatar_url: Some("https://avatars.example.com/u/583231".to_string()),
            html_url: Some("https://github.com/octocat".to_string()),
        }
    }

    fn pull_request_record(additions: Option<i32>, deletions: Option<i32>) -> PlatformPullRequest {
        PlatformPullRequest {
            github_id: 1001,
            number: 42,
            title: "Speed up parser".to_string(),
            state: PullRequestState::Open,
            url: "https://github.com/o/r/pull/42".to_string(),
            head_ref_name: "perf".to_string(),
            base_ref_name: "main".to_string(),
            created_at: now(),
            updated_at: now(),
            merged_at: None,
            closed_at: None,
            additions,
            deletions,
            author: Some(octocat()),
            labels: vec![],
            assignees: vec![],
            requested_reviewers: vec![],
        }
    }

    /// Render the upsert as SQLite SQL.
    fn sql<A>(params: &UpsertParams<A>) -> String
    where
        A: ActiveModelTrait + Clone,
    {
        <A::Entity as EntityTrait>::insert(params.model.clone())
            .on_conflict(params.on_conflict.clone())
            .build(DatabaseBackend::Sqlite)
            .to_string()
    }

    /// The `DO UPDATE SET ...` tail of an upsert statement.
    fn update_clause(sql: &str) -> &str {
        sql.split("DO UPDATE SET").nth(1).unwrap_or_default()
    }

    #[test]
    fn test_user_update_never_touches_login() {
        let params = user(&octocat(), now());
        let sql = sql(&params);

        assert!(sql.contains(r#"ON CONFLICT ("github_id")"#), "{sql}");
        let update = update_clause(&sql);
        assert!(update.contains(r#""avatar_url" = "excluded"."avatar_url""#), "{sql}");
        assert!(update.contains(r#""html_url" = "excluded"."html_url""#), "{sql}");
        assert!(!update.contains("login"), "{sql}");
        // Login is still written on creation.
        assert_eq!(params.model.login.clone().unwrap(), "octocat");
    }

    #[test]
    fn test_pull_request_matches_on_repository_and_number() {
        let repository_id = Uuid::new_v4();
        let params = pull_request(&pull_request_record(Some(120), Some(45)), repository_id, now());
        let sql = sql(&params);

        assert!(
            sql.contains(r#"ON CONFLICT ("repository_id", "number")"#),
            "{sql}"
        );
        let update = update_clause(&sql);
        for create_only in ["github_id", "\"number\"", "created_at", "\"url\"", "author_id"] {
            assert!(!update.contains(create_only), "{create_only} in {sql}");
        }
        assert!(update.contains(r#""size" = "excluded"."size""#), "{sql}");
        assert_eq!(params.model.size.clone().unwrap(), Some(165));
    }

    #[test]
    fn test_pull_request_without_counts_keeps_stored_size() {
        let params = pull_request(&pull_request_record(None, None), Uuid::new_v4(), now());
        let sql = sql(&params);
        let update = update_clause(&sql);

        assert!(!update.contains("additions"), "{sql}");
        assert!(!update.contains("deletions"), "{sql}");
        assert!(!update.contains("size"), "{sql}");
        assert_eq!(params.model.size.clone().unwrap(), None);
    }

    #[test]
    fn test_merged_pull_request_carries_lead_time() {
        let mut record = pull_request_record(Some(1), Some(1));
        record.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        record.merged_at = Some(Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap());
        record.state = PullRequestState::Closed;

        let params = pull_request(&record, Uuid::new_v4(), now());
        assert_eq!(
            params.model.lead_time_in_seconds.clone().unwrap(),
            Some(129_600)
        );
    }

    #[test]
    fn test_join_rows_do_nothing_on_conflict() {
        let link = pull_request_assignee(Uuid::new_v4(), Uuid::new_v4(), now());
        let sql = pull_request_assignee::Entity::insert(link.model)
            .on_conflict(link.on_conflict)
            .build(DatabaseBackend::Sqlite)
            .to_string();

        assert!(
            sql.contains(r#"ON CONFLICT ("pull_request_id", "user_id") DO NOTHING"#),
            "{sql}"
        );
    }

    #[test]
    fn test_comment_review_link_only_updated_when_resolved() {
        let comment = PlatformComment {
            github_id: 9,
            user: Some(octocat()),
            body: "nit: rename".to_string(),
            file_path: Some("src/lib.rs".to_string()),
            line_number: Some(12),
            review_github_id: Some(77),
            created_at: now(),
            updated_at: now(),
        };
        let pr_id = Uuid::new_v4();

        let unresolved = review_comment(
            &comment,
            pr_id,
            None,
            None,
            CommentType::ReviewComment,
            now(),
        );
        assert!(!update_clause(&sql(&unresolved)).contains("review_id"));

        let resolved = review_comment(
            &comment,
            pr_id,
            None,
            Some(Uuid::new_v4()),
            CommentType::ReviewComment,
            now(),
        );
        assert!(update_clause(&sql(&resolved)).contains(r#""review_id" = "excluded"."review_id""#));
    }

    #[test]
    fn test_review_update_is_limited_to_verdict_fields() {
        let record = PlatformReview {
            github_id: 5,
            user: None,
            state: crate::entity::review_state::ReviewState::Approved,
            body: Some("LGTM".to_string()),
            submitted_at: Some(now()),
        };
        let sql = sql(&review(&record, Uuid::new_v4(), None, now()));
        let update = update_clause(&sql);

        assert!(update.contains(r#""state" = "excluded"."state""#), "{sql}");
        assert!(!update.contains("pull_request_id"), "{sql}");
        assert!(!update.contains("user_id"), "{sql}");
        assert!(!update.contains("created_at"), "{sql}");
    }
}

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entity::comment_type::CommentType;
use crate::entity::review_comment_category::ReviewCommentCategory;
use crate::entity::{pull_request, repository, review, review_comment, user};

use super::errors::Result;

/// Find a repository by owner and name.
pub async fn find_repository(
    db: &DatabaseConnection,
    owner: &str,
    name: &str,
) -> Result<Option<repository::Model>> {
    Ok(repository::Entity::find()
        .filter(repository::Column::Owner.eq(owner))
        .filter(repository::Column::Name.eq(name))
        .one(db)
        .await?)
}

/// Pull requests of a repository whose remote update time is at or after
/// `since`, most recently updated first.
pub async fn find_pull_requests_updated_since(
    db: &DatabaseConnection,
    repository_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<pull_request::Model>> {
    Ok(pull_request::Entity::find()
        .filter(pull_request::Column::RepositoryId.eq(repository_id))
        .filter(pull_request::Column::UpdatedAt.gte(since.fixed_offset()))
        .order_by_desc(pull_request::Column::UpdatedAt)
        .all(db)
        .await?)
}

/// Point a pull request at its author.
pub async fn set_pull_request_author(
    db: &DatabaseConnection,
    pull_request_id: Uuid,
    author_id: Uuid,
) -> Result<()> {
    pull_request::Entity::update_many()
        .col_expr(pull_request::Column::AuthorId, Expr::value(author_id))
        .filter(pull_request::Column::Id.eq(pull_request_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Move a repository's watermark forward to `to`.
///
/// A watermark already at or past `to` is left alone. Returns `true` if the
/// row changed.
pub async fn advance_last_sync(
    db: &DatabaseConnection,
    repository_id: Uuid,
    to: DateTime<Utc>,
) -> Result<bool> {
    let to = to.fixed_offset();
    let result = repository::Entity::update_many()
        .col_expr(repository::Column::LastSync, Expr::value(to))
        .col_expr(
            repository::Column::UpdatedAt,
            Expr::value(Utc::now().fixed_offset()),
        )
        .filter(repository::Column::Id.eq(repository_id))
        .filter(
            Condition::any()
                .add(repository::Column::LastSync.is_null())
                .add(repository::Column::LastSync.lt(to)),
        )
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn find_user_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

/// Find a stored review by its remote ID.
pub async fn find_review_by_github_id(
    db: &DatabaseConnection,
    github_id: i64,
) -> Result<Option<review::Model>> {
    Ok(review::Entity::find()
        .filter(review::Column::GithubId.eq(github_id))
        .one(db)
        .await?)
}

/// Pull requests with any of additions, deletions or size unknown, oldest
/// first, with their repository.
pub async fn find_pull_requests_missing_size(
    db: &DatabaseConnection,
) -> Result<Vec<(pull_request::Model, Option<repository::Model>)>> {
    Ok(pull_request::Entity::find()
        .filter(
            Condition::any()
                .add(pull_request::Column::Additions.is_null())
                .add(pull_request::Column::Deletions.is_null())
                .add(pull_request::Column::Size.is_null()),
        )
        .order_by_asc(pull_request::Column::CreatedAt)
        .find_also_related(repository::Entity)
        .all(db)
        .await?)
}

/// Record line counts for a pull request; size is derived from them.
pub async fn update_pull_request_size(
    db: &DatabaseConnection,
    pull_request_id: Uuid,
    additions: i32,
    deletions: i32,
) -> Result<()> {
    pull_request::Entity::update_many()
        .col_expr(pull_request::Column::Additions, Expr::value(additions))
        .col_expr(pull_request::Column::Deletions, Expr::value(deletions))
        .col_expr(
            pull_request::Column::Size,
            Expr::value(additions.saturating_add(deletions)),
        )
        .filter(pull_request::Column::Id.eq(pull_request_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Number of review comments per category. Unclassified comments are
/// counted under `None`.
pub async fn count_comments_by_category(
    db: &DatabaseConnection,
) -> Result<Vec<(Option<ReviewCommentCategory>, i64)>> {
    Ok(review_comment::Entity::find()
        .select_only()
        .column(review_comment::Column::Category)
        .column_as(Expr::col(review_comment::Column::Id).count(), "count")
        .group_by(review_comment::Column::Category)
        .order_by_asc(review_comment::Column::Category)
        .into_tuple::<(Option<ReviewCommentCategory>, i64)>()
        .all(db)
        .await?)
}

/// Bodies of line comments that have not been classified yet.
pub async fn find_unclassified_review_comment_bodies(
    db: &DatabaseConnection,
) -> Result<Vec<String>> {
    Ok(review_comment::Entity::find()
        .select_only()
        .column(review_comment::Column::Body)
        .filter(review_comment::Column::Category.is_null())
        .filter(review_comment::Column::CommentType.eq(CommentType::ReviewComment))
        .into_tuple::<String>()
        .all(db)
        .await?)
}

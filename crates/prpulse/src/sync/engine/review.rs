use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::entity::comment_type::CommentType;
use crate::entity::{pull_request, repository};
use crate::platform::{PlatformClient, PlatformComment};
use crate::store::{self, params, upsert};
use crate::sync::errors::Result;
use crate::sync::progress::ProgressCallback;
use crate::sync::types::SyncOptions;

use super::fetch::{fetch_all_pages, pace};

/// Counts for one pull request's review and comment pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActivityStats {
    pub reviews: usize,
    pub comments: usize,
    /// Conversation comments written by the pull request author.
    pub skipped: usize,
}

/// Counts for one pull request's comments.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommentStats {
    pub stored: usize,
    pub skipped: usize,
}

/// Sync reviews, then comments, of one stored pull request.
pub async fn sync_pull_request_activity<C>(
    client: &C,
    db: &DatabaseConnection,
    repository: &repository::Model,
    pull_request: &pull_request::Model,
    options: &SyncOptions,
    now: DateTime<Utc>,
    on_progress: Option<&ProgressCallback>,
) -> Result<ActivityStats>
where
    C: PlatformClient + ?Sized,
{
    let reviews =
        materialize_reviews(client, db, repository, pull_request, options, now, on_progress)
            .await?;
    pace(options.request_delay).await;
    let comments =
        materialize_comments(client, db, repository, pull_request, options, now, on_progress)
            .await?;

    Ok(ActivityStats {
        reviews,
        comments: comments.stored,
        skipped: comments.skipped,
    })
}

/// Fetch every review of a pull request and upsert it with its reviewer.
///
/// Returns the number of reviews written.
pub async fn materialize_reviews<C>(
    client: &C,
    db: &DatabaseConnection,
    repository: &repository::Model,
    pull_request: &pull_request::Model,
    options: &SyncOptions,
    now: DateTime<Utc>,
    on_progress: Option<&ProgressCallback>,
) -> Result<usize>
where
    C: PlatformClient + ?Sized,
{
    let reviews = fetch_all_pages(options, "list reviews", on_progress, |page, per_page| {
        client.list_reviews(
            &repository.owner,
            &repository.name,
            pull_request.number,
            page,
            per_page,
        )
    })
    .await?;

    for review in &reviews {
        let user_id = match &review.user {
            Some(user) => Some(upsert(db, params::user(user, now)).await?.id),
            None => None,
        };
        upsert(db, params::review(review, pull_request.id, user_id, now)).await?;
    }

    tracing::debug!(number = pull_request.number, count = reviews.len(), "Reviews synced");
    Ok(reviews.len())
}

/// Fetch line comments and conversation comments of a pull request and
/// upsert them.
///
/// Line comments are linked to their parent review when it is already
/// stored. Conversation comments by the pull request author are skipped.
pub async fn materialize_comments<C>(
    client: &C,
    db: &DatabaseConnection,
    repository: &repository::Model,
    pull_request: &pull_request::Model,
    options: &SyncOptions,
    now: DateTime<Utc>,
    on_progress: Option<&ProgressCallback>,
) -> Result<CommentStats>
where
    C: PlatformClient + ?Sized,
{
    let mut stats = CommentStats::default();

    let line_comments = fetch_all_pages(
        options,
        "list review comments",
        on_progress,
        |page, per_page| {
            client.list_review_comments(
                &repository.owner,
                &repository.name,
                pull_request.number,
                page,
                per_page,
            )
        },
    )
    .await?;

    for comment in &line_comments {
        let user_id = upsert_author(db, comment, now).await?;
        let review_id = match comment.review_github_id {
            Some(github_id) => store::find_review_by_github_id(db, github_id)
                .await?
                .map(|review| review.id),
            None => None,
        };
        upsert(
            db,
            params::review_comment(
                comment,
                pull_request.id,
                user_id,
                review_id,
                CommentType::ReviewComment,
                now,
            ),
        )
        .await?;
        stats.stored += 1;
    }

    pace(options.request_delay).await;
    let issue_comments = fetch_all_pages(
        options,
        "list issue comments",
        on_progress,
        |page, per_page| {
            client.list_issue_comments(
                &repository.owner,
                &repository.name,
                pull_request.number,
                page,
                per_page,
            )
        },
    )
    .await?;

    let author_github_id = match pull_request.author_id {
        Some(author_id) => store::find_user_by_id(db, author_id)
            .await?
            .map(|user| user.github_id),
        None => None,
    };

    for comment in &issue_comments {
        if is_authored_by(author_github_id, comment) {
            stats.skipped += 1;
            continue;
        }
        let user_id = upsert_author(db, comment, now).await?;
        upsert(
            db,
            params::review_comment(
                comment,
                pull_request.id,
                user_id,
                None,
                CommentType::IssueComment,
                now,
            ),
        )
        .await?;
        stats.stored += 1;
    }

    tracing::debug!(
        number = pull_request.number,
        stored = stats.stored,
        skipped = stats.skipped,
        "Comments synced"
    );
    Ok(stats)
}

async fn upsert_author(
    db: &DatabaseConnection,
    comment: &PlatformComment,
    now: DateTime<Utc>,
) -> Result<Option<uuid::Uuid>> {
    Ok(match &comment.user {
        Some(user) => Some(upsert(db, params::user(user, now)).await?.id),
        None => None,
    })
}

/// Whether the comment was written by the pull request author.
///
/// Both sides must be known; an anonymous comment is never the author's.
fn is_authored_by(author_github_id: Option<i64>, comment: &PlatformComment) -> bool {
    matches!(
        (author_github_id, &comment.user),
        (Some(author), Some(user)) if author == user.github_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformUser;

    fn comment(user: Option<i64>) -> PlatformComment {
        PlatformComment {
            github_id: 1,
            user: user.map(|github_id| PlatformUser {
                github_id,
                login: format!("user{github_id}"),
                avatar_url: None,
                html_url: None,
            }),
            body: "Thanks!".to_string(),
            file_path: None,
            line_number: None,
            review_github_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_authored_by_matching_ids() {
        assert!(is_authored_by(Some(7), &comment(Some(7))));
    }

    #[test]
    fn test_is_authored_by_other_user() {
        assert!(!is_authored_by(Some(7), &comment(Some(8))));
    }

    #[test]
    fn test_is_authored_by_requires_both_sides() {
        assert!(!is_authored_by(None, &comment(Some(7))));
        assert!(!is_authored_by(Some(7), &comment(None)));
        assert!(!is_authored_by(None, &comment(None)));
    }
}

//! PullRequest entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::pull_request_state::PullRequestState;

/// A pull request, unique per (repository, number).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pull_requests")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    // ─── Identity ────────────────────────────────────────────────────────────
    /// Remote numeric ID. Written on creation only.
    #[sea_orm(unique)]
    pub github_id: i64,
    /// Owning repository.
    pub repository_id: Uuid,
    /// Sequential number within the repository.
    pub number: i32,

    // ─── Content ─────────────────────────────────────────────────────────────
    #[sea_orm(column_type = "Text")]
    pub title: String,
    pub state: PullRequestState,
    /// Canonical web URL.
    #[sea_orm(column_type = "Text")]
    pub url: String,
    /// Source branch.
    pub head_ref_name: String,
    /// Target branch.
    pub base_ref_name: String,
    pub author_id: Option<Uuid>,

    // ─── Timestamps (remote) ─────────────────────────────────────────────────
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub merged_at: Option<DateTimeWithTimeZone>,
    pub closed_at: Option<DateTimeWithTimeZone>,

    // ─── Metrics ─────────────────────────────────────────────────────────────
    pub additions: Option<i32>,
    pub deletions: Option<i32>,
    /// `additions + deletions`, once both are known.
    pub size: Option<i32>,
    /// Seconds from creation to merge. `None` unless merged.
    pub lead_time_in_seconds: Option<i64>,

    // ─── Tracking ────────────────────────────────────────────────────────────
    /// When this row was last written by a sync.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepositoryId",
        to = "super::repository::Column::Id"
    )]
    Repository,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
    #[sea_orm(has_many = "super::review_comment::Entity")]
    ReviewComment,
    #[sea_orm(has_many = "super::pull_request_label::Entity")]
    PullRequestLabel,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::review_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewComment.def()
    }
}

impl Related<super::pull_request_label::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequestLabel.def()
    }
}

impl Related<super::label::Entity> for Entity {
    fn to() -> RelationDef {
        super::pull_request_label::Relation::Label.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::pull_request_label::Relation::PullRequest.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the pull request was merged rather than just closed.
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Whether any of the size columns is still unknown.
    pub fn is_missing_size(&self) -> bool {
        self.size.is_none() || self.additions.is_none() || self.deletions.is_none()
    }
}

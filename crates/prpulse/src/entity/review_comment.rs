//! ReviewComment entity - line comments and conversation comments on a pull request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::comment_type::CommentType;
use crate::entity::review_comment_category::ReviewCommentCategory;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review_comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub github_id: i64,

    // ─── Links ───────────────────────────────────────────────────────────────
    pub pull_request_id: Uuid,
    /// Parent review. Only line comments have one, and only once it is synced.
    pub review_id: Option<Uuid>,
    pub user_id: Option<Uuid>,

    // ─── Content ─────────────────────────────────────────────────────────────
    #[sea_orm(column_type = "Text")]
    pub body: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub file_path: Option<String>,
    pub line_number: Option<i32>,
    pub comment_type: CommentType,
    /// Written by the external classifier; `None` until classified.
    pub category: Option<ReviewCommentCategory>,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    /// Remote creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Remote update time.
    pub updated_at: DateTimeWithTimeZone,
    /// When this system first wrote the row.
    pub local_created_at: DateTimeWithTimeZone,
    /// When this system last wrote the row.
    pub local_updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pull_request::Entity",
        from = "Column::PullRequestId",
        to = "super::pull_request::Column::Id"
    )]
    PullRequest,
    #[sea_orm(
        belongs_to = "super::review::Entity",
        from = "Column::ReviewId",
        to = "super::review::Column::Id"
    )]
    Review,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

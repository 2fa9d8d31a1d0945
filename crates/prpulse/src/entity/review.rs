//! Review entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::review_state::ReviewState;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub github_id: i64,
    pub pull_request_id: Uuid,
    /// Reviewer, if the account still exists.
    pub user_id: Option<Uuid>,
    pub state: ReviewState,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    /// `None` while the review is pending.
    pub submitted_at: Option<DateTimeWithTimeZone>,
    /// Local bookkeeping, not remote timestamps.
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::review_comment::Entity")]
    ReviewComment,
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::review_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewComment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

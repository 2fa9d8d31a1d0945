//! Label entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "labels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub github_id: i64,
    pub name: String,
    /// Hex color without the leading `#`.
    pub color: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pull_request_label::Entity")]
    PullRequestLabel,
}

impl Related<super::pull_request_label::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequestLabel.def()
    }
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        super::pull_request_label::Relation::PullRequest.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::pull_request_label::Relation::Label.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

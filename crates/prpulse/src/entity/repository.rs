//! Repository entity - one row per tracked (owner, name) pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A tracked source repository and its sync watermark.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repositories")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Remote numeric ID.
    #[sea_orm(unique)]
    pub github_id: i64,
    /// Owner login (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Canonical web URL.
    #[sea_orm(column_type = "Text")]
    pub url: String,

    /// Watermark: activity updated at or before this instant is already synced.
    /// `None` until the first successful pass.
    pub last_sync: Option<DateTimeWithTimeZone>,

    /// When this row was first written.
    pub created_at: DateTimeWithTimeZone,
    /// When this row was last written.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pull_request::Entity")]
    PullRequest,
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Compute the full name (owner/name).
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

//! Review comment discriminator.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a comment was posted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CommentType {
    /// Anchored to a file and line of the diff.
    #[sea_orm(string_value = "REVIEW_COMMENT")]
    ReviewComment,
    /// Posted to the pull request's conversation thread.
    #[sea_orm(string_value = "ISSUE_COMMENT")]
    IssueComment,
}

impl std::fmt::Display for CommentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentType::ReviewComment => write!(f, "REVIEW_COMMENT"),
            CommentType::IssueComment => write!(f, "ISSUE_COMMENT"),
        }
    }
}

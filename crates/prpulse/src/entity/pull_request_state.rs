//! Pull request lifecycle state.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Local pull request state.
///
/// The remote "merged" state is not a separate variant: a merged pull request
/// is `Closed` with `merged_at` set.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PullRequestState {
    #[sea_orm(string_value = "OPEN")]
    #[default]
    Open,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl PullRequestState {
    /// Map a remote state string onto the local enumeration.
    ///
    /// Returns `None` for states this schema does not know about.
    pub fn from_remote(state: &str) -> Option<Self> {
        match state.to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" | "merged" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PullRequestState::Open => write!(f, "OPEN"),
            PullRequestState::Closed => write!(f, "CLOSED"),
        }
    }
}

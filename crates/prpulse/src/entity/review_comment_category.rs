//! Classification buckets for review comments.
//!
//! The classifier itself lives outside this crate; the schema only stores
//! its verdict.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ReviewCommentCategory {
    #[sea_orm(string_value = "style")]
    Style,
    #[sea_orm(string_value = "logic")]
    Logic,
    #[sea_orm(string_value = "performance")]
    Performance,
    #[sea_orm(string_value = "security")]
    Security,
    #[sea_orm(string_value = "readability")]
    Readability,
    #[sea_orm(string_value = "testing")]
    Testing,
    #[sea_orm(string_value = "documentation")]
    Documentation,
    #[sea_orm(string_value = "architecture")]
    Architecture,
    #[sea_orm(string_value = "ci_automation")]
    CiAutomation,
    #[sea_orm(string_value = "other")]
    Other,
}

impl ReviewCommentCategory {
    /// Category assigned without consulting a classifier, if any.
    ///
    /// Bodies that are just a link (bot output, CI reports) are `CiAutomation`.
    pub fn shortcut_for(body: &str) -> Option<Self> {
        let trimmed = body.trim_start();
        let is_link = trimmed
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"));
        is_link.then_some(Self::CiAutomation)
    }
}

impl std::fmt::Display for ReviewCommentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_link_bodies_shortcut_to_ci_automation() {
        assert_eq!(
            ReviewCommentCategory::shortcut_for("https://ci.example.com/build/42"),
            Some(ReviewCommentCategory::CiAutomation)
        );
        assert_eq!(
            ReviewCommentCategory::shortcut_for("  HTTP://example.com"),
            Some(ReviewCommentCategory::CiAutomation)
        );
        assert_eq!(
            ReviewCommentCategory::shortcut_for("please rename this"),
            None
        );
        assert_eq!(ReviewCommentCategory::shortcut_for("ht"), None);
    }

    #[test]
    fn test_closed_set_has_ten_members() {
        assert_eq!(ReviewCommentCategory::iter().count(), 10);
    }

    #[test]
    fn test_display_uses_stored_value() {
        assert_eq!(ReviewCommentCategory::CiAutomation.to_string(), "ci_automation");
    }
}

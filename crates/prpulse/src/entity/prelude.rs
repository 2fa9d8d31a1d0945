//! Common re-exports for convenient entity usage.

pub use super::comment_type::CommentType;
pub use super::label::{
    ActiveModel as LabelActiveModel, Column as LabelColumn, Entity as Label, Model as LabelModel,
};
pub use super::pull_request::{
    ActiveModel as PullRequestActiveModel, Column as PullRequestColumn, Entity as PullRequest,
    Model as PullRequestModel,
};
pub use super::pull_request_assignee::{
    ActiveModel as PullRequestAssigneeActiveModel, Column as PullRequestAssigneeColumn,
    Entity as PullRequestAssignee, Model as PullRequestAssigneeModel,
};
pub use super::pull_request_label::{
    ActiveModel as PullRequestLabelActiveModel, Column as PullRequestLabelColumn,
    Entity as PullRequestLabel, Model as PullRequestLabelModel,
};
pub use super::pull_request_reviewer::{
    ActiveModel as PullRequestReviewerActiveModel, Column as PullRequestReviewerColumn,
    Entity as PullRequestReviewer, Model as PullRequestReviewerModel,
};
pub use super::pull_request_state::PullRequestState;
pub use super::repository::{
    ActiveModel as RepositoryActiveModel, Column as RepositoryColumn, Entity as Repository,
    Model as RepositoryModel,
};
pub use super::review::{
    ActiveModel as ReviewActiveModel, Column as ReviewColumn, Entity as Review,
    Model as ReviewModel,
};
pub use super::review_comment::{
    ActiveModel as ReviewCommentActiveModel, Column as ReviewCommentColumn,
    Entity as ReviewComment, Model as ReviewCommentModel,
};
pub use super::review_comment_category::ReviewCommentCategory;
pub use super::review_state::ReviewState;
pub use super::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
};

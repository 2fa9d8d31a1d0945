//! SeaORM entity definitions for the prpulse database schema.

pub mod comment_type;
pub mod label;
pub mod prelude;
pub mod pull_request;
pub mod pull_request_assignee;
pub mod pull_request_label;
pub mod pull_request_reviewer;
pub mod pull_request_state;
pub mod repository;
pub mod review;
pub mod review_comment;
pub mod review_comment_category;
pub mod review_state;
pub mod user;

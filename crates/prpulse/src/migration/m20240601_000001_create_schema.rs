//! Initial migration: repositories, pull requests and their review activity.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_repositories(manager).await?;
        self.create_users(manager).await?;
        self.create_labels(manager).await?;
        self.create_pull_requests(manager).await?;
        self.create_pull_request_labels(manager).await?;
        self.create_user_links(manager).await?;
        self.create_reviews(manager).await?;
        self.create_review_comments(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first so foreign keys never dangle.
        manager
            .drop_table(Table::drop().table(ReviewComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PullRequestReviewers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PullRequestAssignees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PullRequestLabels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PullRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Labels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repositories::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_repositories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repositories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Repositories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Repositories::GithubId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Repositories::Owner).string().not_null())
                    .col(ColumnDef::new(Repositories::Name).string().not_null())
                    .col(ColumnDef::new(Repositories::Url).text().not_null())
                    .col(
                        ColumnDef::new(Repositories::LastSync)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Repositories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repositories_owner_name")
                    .table(Repositories::Table)
                    .col(Repositories::Owner)
                    .col(Repositories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repositories_github_id")
                    .table(Repositories::Table)
                    .col(Repositories::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_users(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::GithubId).big_integer().not_null())
                    .col(ColumnDef::new(Users::Login).string().not_null())
                    .col(ColumnDef::new(Users::AvatarUrl).text().null())
                    .col(ColumnDef::new(Users::HtmlUrl).text().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_github_id")
                    .table(Users::Table)
                    .col(Users::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lookup only; logins are not unique across renames.
        manager
            .create_index(
                Index::create()
                    .name("idx_users_login")
                    .table(Users::Table)
                    .col(Users::Login)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_labels(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Labels::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Labels::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Labels::GithubId).big_integer().not_null())
                    .col(ColumnDef::new(Labels::Name).string().not_null())
                    .col(ColumnDef::new(Labels::Color).string().not_null())
                    .col(ColumnDef::new(Labels::Description).text().null())
                    .col(
                        ColumnDef::new(Labels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Labels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_labels_github_id")
                    .table(Labels::Table)
                    .col(Labels::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_pull_requests(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PullRequests::Table)
                    .if_not_exists()
                    // Identity
                    .col(
                        ColumnDef::new(PullRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::GithubId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::RepositoryId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PullRequests::Number).integer().not_null())
                    // Content
                    .col(ColumnDef::new(PullRequests::Title).text().not_null())
                    .col(
                        ColumnDef::new(PullRequests::State)
                            .string()
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(ColumnDef::new(PullRequests::Url).text().not_null())
                    .col(
                        ColumnDef::new(PullRequests::HeadRefName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::BaseRefName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PullRequests::AuthorId).uuid().null())
                    // Timestamps
                    .col(
                        ColumnDef::new(PullRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::MergedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::ClosedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    // Metrics
                    .col(ColumnDef::new(PullRequests::Additions).integer().null())
                    .col(ColumnDef::new(PullRequests::Deletions).integer().null())
                    .col(ColumnDef::new(PullRequests::Size).integer().null())
                    .col(
                        ColumnDef::new(PullRequests::LeadTimeInSeconds)
                            .big_integer()
                            .null(),
                    )
                    // Tracking
                    .col(
                        ColumnDef::new(PullRequests::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_requests_repository")
                            .from(PullRequests::Table, PullRequests::RepositoryId)
                            .to(Repositories::Table, Repositories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_requests_author")
                            .from(PullRequests::Table, PullRequests::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: (repository_id, number)
        manager
            .create_index(
                Index::create()
                    .name("idx_pull_requests_repository_number")
                    .table(PullRequests::Table)
                    .col(PullRequests::RepositoryId)
                    .col(PullRequests::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pull_requests_github_id")
                    .table(PullRequests::Table)
                    .col(PullRequests::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Drives the review/comment pass and metric queries
        manager
            .create_index(
                Index::create()
                    .name("idx_pull_requests_repository_updated")
                    .table(PullRequests::Table)
                    .col(PullRequests::RepositoryId)
                    .col((PullRequests::UpdatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pull_requests_merged_at")
                    .table(PullRequests::Table)
                    .col(PullRequests::MergedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_pull_request_labels(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PullRequestLabels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PullRequestLabels::PullRequestId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequestLabels::LabelId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequestLabels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(PullRequestLabels::PullRequestId)
                            .col(PullRequestLabels::LabelId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_request_labels_pull_request")
                            .from(PullRequestLabels::Table, PullRequestLabels::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_request_labels_label")
                            .from(PullRequestLabels::Table, PullRequestLabels::LabelId)
                            .to(Labels::Table, Labels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    /// Assignee and requested-reviewer joins share a shape.
    async fn create_user_links(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PullRequestAssignees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PullRequestAssignees::PullRequestId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequestAssignees::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequestAssignees::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PullRequestAssignees::PullRequestId)
                            .col(PullRequestAssignees::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_request_assignees_pull_request")
                            .from(
                                PullRequestAssignees::Table,
                                PullRequestAssignees::PullRequestId,
                            )
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_request_assignees_user")
                            .from(PullRequestAssignees::Table, PullRequestAssignees::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PullRequestReviewers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PullRequestReviewers::PullRequestId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequestReviewers::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequestReviewers::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PullRequestReviewers::PullRequestId)
                            .col(PullRequestReviewers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_request_reviewers_pull_request")
                            .from(
                                PullRequestReviewers::Table,
                                PullRequestReviewers::PullRequestId,
                            )
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_request_reviewers_user")
                            .from(PullRequestReviewers::Table, PullRequestReviewers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_reviews(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reviews::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reviews::GithubId).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::PullRequestId).uuid().not_null())
                    .col(ColumnDef::new(Reviews::UserId).uuid().null())
                    .col(ColumnDef::new(Reviews::State).string().not_null())
                    .col(ColumnDef::new(Reviews::Body).text().null())
                    .col(
                        ColumnDef::new(Reviews::SubmittedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Reviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_pull_request")
                            .from(Reviews::Table, Reviews::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_user")
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_github_id")
                    .table(Reviews::Table)
                    .col(Reviews::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_pull_request")
                    .table(Reviews::Table)
                    .col(Reviews::PullRequestId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_review_comments(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReviewComments::GithubId)
                            .big_integer()
                            .not_null(),
                    )
                    // Links
                    .col(
                        ColumnDef::new(ReviewComments::PullRequestId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReviewComments::ReviewId).uuid().null())
                    .col(ColumnDef::new(ReviewComments::UserId).uuid().null())
                    // Content
                    .col(ColumnDef::new(ReviewComments::Body).text().not_null())
                    .col(ColumnDef::new(ReviewComments::FilePath).text().null())
                    .col(ColumnDef::new(ReviewComments::LineNumber).integer().null())
                    .col(
                        ColumnDef::new(ReviewComments::CommentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReviewComments::Category).string().null())
                    // Timestamps
                    .col(
                        ColumnDef::new(ReviewComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReviewComments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReviewComments::LocalCreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ReviewComments::LocalUpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_comments_pull_request")
                            .from(ReviewComments::Table, ReviewComments::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_comments_review")
                            .from(ReviewComments::Table, ReviewComments::ReviewId)
                            .to(Reviews::Table, Reviews::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_comments_user")
                            .from(ReviewComments::Table, ReviewComments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_review_comments_github_id")
                    .table(ReviewComments::Table)
                    .col(ReviewComments::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // The external classifier scans for uncategorized line comments
        manager
            .create_index(
                Index::create()
                    .name("idx_review_comments_type_category")
                    .table(ReviewComments::Table)
                    .col(ReviewComments::CommentType)
                    .col(ReviewComments::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "repositories")]
enum Repositories {
    Table,
    Id,
    GithubId,
    Owner,
    Name,
    Url,
    LastSync,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "users")]
enum Users {
    Table,
    Id,
    GithubId,
    Login,
    AvatarUrl,
    HtmlUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "labels")]
enum Labels {
    Table,
    Id,
    GithubId,
    Name,
    Color,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "pull_requests")]
enum PullRequests {
    Table,
    Id,
    GithubId,
    RepositoryId,
    Number,
    Title,
    State,
    Url,
    HeadRefName,
    BaseRefName,
    AuthorId,
    CreatedAt,
    UpdatedAt,
    MergedAt,
    ClosedAt,
    Additions,
    Deletions,
    Size,
    LeadTimeInSeconds,
    SyncedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "pull_request_labels")]
enum PullRequestLabels {
    Table,
    PullRequestId,
    LabelId,
    CreatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "pull_request_assignees")]
enum PullRequestAssignees {
    Table,
    PullRequestId,
    UserId,
    AssignedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "pull_request_reviewers")]
enum PullRequestReviewers {
    Table,
    PullRequestId,
    UserId,
    RequestedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "reviews")]
enum Reviews {
    Table,
    Id,
    GithubId,
    PullRequestId,
    UserId,
    State,
    Body,
    SubmittedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "review_comments")]
enum ReviewComments {
    Table,
    Id,
    GithubId,
    PullRequestId,
    ReviewId,
    UserId,
    Body,
    FilePath,
    LineNumber,
    CommentType,
    Category,
    CreatedAt,
    UpdatedAt,
    LocalCreatedAt,
    LocalUpdatedAt,
}

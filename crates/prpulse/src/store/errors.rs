use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur while reading or writing the datastore.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A row that must exist was not found.
    #[error("Record not found: {context}")]
    NotFound { context: String },
}

impl StoreError {
    pub fn not_found(context: impl Into<String>) -> Self {
        Self::NotFound {
            context: context.into(),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

use thiserror::Error;

/// Errors that can occur when interacting with a product or inventory store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same unique name already exists.
    #[error("Duplicate name: {0}")]
    Duplicate(String),

    /// No record with the given name exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be mapped back into a domain value.
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

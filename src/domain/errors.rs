//! Domain error types

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// No row for the requested key
    #[error("Resource not found")]
    NotFound,
    /// Row changed between read and write and still exists
    #[error("Book {id} was modified by another request")]
    Concurrency { id: i32 },
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

//! Repository trait definitions
//!
//! These traits define the contract for data access.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DomainError;
use crate::models::{Book, BookDetailDto, BookDto};

/// Repository trait for the Book resource
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books as summaries
    async fn find_all(&self) -> Result<Vec<BookDto>, DomainError>;

    /// Summary of a single book
    async fn find_by_id(&self, id: i32) -> Result<Option<BookDto>, DomainError>;

    /// Full projection of a single book
    async fn find_details(&self, id: i32) -> Result<Option<BookDetailDto>, DomainError>;

    /// Books whose genre matches, ignoring ASCII case
    async fn find_by_genre(&self, genre: &str) -> Result<Vec<BookDto>, DomainError>;

    async fn find_by_author(&self, author_id: i32) -> Result<Vec<BookDto>, DomainError>;

    /// Books published on the given calendar day, whatever the time of day
    async fn find_by_publish_date(&self, day: NaiveDate) -> Result<Vec<BookDto>, DomainError>;

    /// Insert a new book, ignoring any id it carries
    async fn create(&self, book: Book) -> Result<Book, DomainError>;

    /// Replace every field of the stored book with id `book.book_id`.
    ///
    /// Fails with [`DomainError::NotFound`] when the row is gone and
    /// [`DomainError::Concurrency`] when it exists but no longer matches the
    /// expected version.
    async fn update(&self, book: Book) -> Result<(), DomainError>;

    /// Remove a book and hand back what was stored
    async fn delete(&self, id: i32) -> Result<Book, DomainError>;
}

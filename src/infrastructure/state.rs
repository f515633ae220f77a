//! Application state shared by every handler

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::BookRepository;
use crate::infrastructure::SeaOrmBookRepository;

/// Cloned into each request; holds the pool, never per-request data.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
}

impl AppState {
    /// Create a new AppState backed by SeaORM repositories
    pub fn new(db: DatabaseConnection) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        Self { db, book_repo }
    }

    /// Swap in another repository implementation
    pub fn with_book_repo(db: DatabaseConnection, book_repo: Arc<dyn BookRepository>) -> Self {
        Self { db, book_repo }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

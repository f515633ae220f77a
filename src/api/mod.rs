pub mod books;
pub mod error;
pub mod health;
pub mod json;

pub use error::{ApiError, ModelState};

use axum::{Router, routing::get};

use crate::infrastructure::AppState;

/// Routes served under `/api`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book_or_genre)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/details", get(books::get_book_details))
        .route("/books/date/:pubdate", get(books::books_by_publish_date))
        // Books of an author
        .route("/author/:author_id/book", get(books::books_by_author))
        .with_state(state)
}

use crate::api;
use crate::models::{Book, BookDetailDto, BookDto, BookLookup};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::get_book_or_genre,
        api::books::get_book_details,
        api::books::books_by_author,
        api::books::books_by_publish_date,
        api::books::update_book,
        api::books::create_book,
        api::books::delete_book,
    ),
    components(schemas(Book, BookDto, BookDetailDto, BookLookup)),
    tags(
        (name = "books-api", description = "Books API")
    )
)]
pub struct ApiDoc;

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use super::json::{PrettyJson, ValidJson};
use crate::infrastructure::AppState;
use crate::models::{Book, BookDetailDto, BookDto, BookLookup};
use crate::utils::date;

/// What `/books/{segment}` addresses: integers are ids, anything else is a genre.
#[derive(Debug, PartialEq)]
enum BookKey<'a> {
    Id(i32),
    Genre(&'a str),
}

impl<'a> BookKey<'a> {
    fn parse(segment: &'a str) -> Self {
        match segment.parse() {
            Ok(id) => BookKey::Id(id),
            Err(_) => BookKey::Genre(segment),
        }
    }
}

/// An `{id:int}` segment. A non-integer matches no route, hence 404.
fn int_segment(segment: &str) -> Result<i32, ApiError> {
    segment.parse().map_err(|_| ApiError::not_found())
}

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "Every book", body = [BookDto])
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
) -> Result<PrettyJson<Vec<BookDto>>, ApiError> {
    let books = state.book_repo.find_all().await?;
    Ok(PrettyJson(books))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(
        ("id" = String, Path, description = "Book id, or a genre when not an integer")
    ),
    responses(
        (status = 200, description = "A single book for an integer id, or an array of the books of a genre (possibly empty)", body = BookLookup),
        (status = 404, description = "No book with this id")
    )
)]
pub async fn get_book_or_genre(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<PrettyJson<BookLookup>, ApiError> {
    let lookup = match BookKey::parse(&segment) {
        BookKey::Id(id) => {
            let book = state
                .book_repo
                .find_by_id(id)
                .await?
                .ok_or_else(ApiError::not_found)?;
            BookLookup::Book(book)
        }
        BookKey::Genre(genre) => BookLookup::Genre(state.book_repo.find_by_genre(genre).await?),
    };
    Ok(PrettyJson(lookup))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}/details",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Full details of the book", body = BookDetailDto),
        (status = 404, description = "No book with this id")
    )
)]
pub async fn get_book_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<PrettyJson<BookDetailDto>, ApiError> {
    let id = int_segment(&id)?;
    let book = state
        .book_repo
        .find_details(id)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(PrettyJson(book))
}

#[utoipa::path(
    get,
    path = "/api/author/{author_id}/book",
    params(("author_id" = i32, Path, description = "Author id")),
    responses(
        (status = 200, description = "Books by the author (possibly empty)", body = [BookDto])
    )
)]
pub async fn books_by_author(
    State(state): State<AppState>,
    Path(author_id): Path<String>,
) -> Result<PrettyJson<Vec<BookDto>>, ApiError> {
    let author_id = int_segment(&author_id)?;
    let books = state.book_repo.find_by_author(author_id).await?;
    Ok(PrettyJson(books))
}

#[utoipa::path(
    get,
    path = "/api/books/date/{pubdate}",
    params(("pubdate" = String, Path, description = "Date or date-time; only the day is compared")),
    responses(
        (status = 200, description = "Books published that day (possibly empty)", body = [BookDto]),
        (status = 404, description = "Not a date")
    )
)]
pub async fn books_by_publish_date(
    State(state): State<AppState>,
    Path(pubdate): Path<String>,
) -> Result<PrettyJson<Vec<BookDto>>, ApiError> {
    let day = date::parse_day(&pubdate).ok_or_else(ApiError::not_found)?;
    let books = state.book_repo.find_by_publish_date(day).await?;
    Ok(PrettyJson(books))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id, must equal bookId of the body")),
    request_body = Book,
    responses(
        (status = 204, description = "Book replaced"),
        (status = 400, description = "Invalid book or id mismatch"),
        (status = 404, description = "Book no longer exists")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<ValidJson<Book>, ApiError>,
) -> Result<StatusCode, ApiError> {
    // The route constraint is checked before the body is looked at.
    let id = int_segment(&id)?;
    let ValidJson(book) = body?;
    if id != book.book_id {
        return Err(ApiError::BadRequest(format!(
            "Route id {} does not match bookId {}.",
            id, book.book_id
        )));
    }

    state.book_repo.update(book).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid book")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidJson(book): ValidJson<Book>,
) -> Result<Response, ApiError> {
    let created = state.book_repo.create(book).await?;
    let location = format!("/api/books/{}", created.book_id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        PrettyJson(created),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "The deleted book", body = Book),
        (status = 404, description = "No book with this id")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<PrettyJson<Book>, ApiError> {
    let id = int_segment(&id)?;
    let deleted = state.book_repo.delete(id).await?;
    Ok(PrettyJson(deleted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_segments_are_ids() {
        assert_eq!(BookKey::parse("5"), BookKey::Id(5));
        assert_eq!(BookKey::parse("-2"), BookKey::Id(-2));
    }

    #[test]
    fn other_segments_are_genres() {
        assert_eq!(BookKey::parse("Fantasy"), BookKey::Genre("Fantasy"));
        assert_eq!(BookKey::parse("5a"), BookKey::Genre("5a"));
        assert_eq!(BookKey::parse("99999999999"), BookKey::Genre("99999999999"));
    }

    #[test]
    fn int_segment_rejects_non_integers_as_not_found() {
        assert_eq!(int_segment("12").unwrap(), 12);
        let err = int_segment("abc").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}

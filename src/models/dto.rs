//! Read-only projections of a book, selected straight from the query with the
//! author flattened to its name.

use chrono::NaiveDateTime;
use sea_orm::FromQueryResult;
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::date;

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailDto {
    pub title: String,
    pub genre: Option<String>,
    #[serde(serialize_with = "date::flexible::serialize")]
    #[schema(value_type = String, example = "2000-12-16T00:00:00")]
    pub publish_date: NaiveDateTime,
    pub price: f64,
    pub description: Option<String>,
    pub author: String,
}

/// Answer of `/books/{segment}`: one book for an id, a list for a genre.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BookLookup {
    Book(BookDto),
    Genre(Vec<BookDto>),
}

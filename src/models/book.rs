use chrono::NaiveDateTime;
use garde::Validate;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::date;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub book_id: i32,
    pub title: String,
    pub genre: Option<String>,
    /// Lowercased genre, the column genre lookups compare against
    pub genre_key: Option<String>,
    pub publish_date: NaiveDateTime,
    pub price: f64,
    pub description: Option<String>,
    pub author_id: i32,
    /// Concurrency token, bumped by every update
    #[sea_orm(default_value = 1)]
    pub row_version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::AuthorId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Case-insensitive lookup key for a genre. SQLite's `LOWER` only folds ASCII,
/// so the key is computed here and stored next to the genre.
pub fn genre_key(genre: &str) -> String {
    genre.to_lowercase()
}

fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("The Title field is required."));
    }
    Ok(())
}

fn valid_price(value: &f64, _ctx: &()) -> garde::Result {
    if !value.is_finite() || *value < 0.0 {
        return Err(garde::Error::new("The Price field must be a non-negative number."));
    }
    Ok(())
}

/// Full book as it travels over the wire, used for every write and returned by
/// create and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    #[garde(skip)]
    pub book_id: i32,
    #[garde(length(min = 1, max = 200), custom(not_blank))]
    pub title: String,
    #[serde(default)]
    #[garde(length(max = 100))]
    pub genre: Option<String>,
    #[serde(with = "date::flexible")]
    #[schema(value_type = String, example = "2000-12-16T00:00:00")]
    #[garde(skip)]
    pub publish_date: NaiveDateTime,
    #[garde(custom(valid_price))]
    pub price: f64,
    #[serde(default)]
    #[garde(length(max = 4000))]
    pub description: Option<String>,
    #[garde(range(min = 1))]
    pub author_id: i32,
    /// Version the client last saw. When present, an update only applies if the
    /// stored row still carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub row_version: Option<i32>,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            book_id: model.book_id,
            title: model.title,
            genre: model.genre,
            publish_date: model.publish_date,
            price: model.price,
            description: model.description,
            author_id: model.author_id,
            row_version: Some(model.row_version),
        }
    }
}

// Key and version are left unset: inserts take a generated key and updates
// address the row by filter.
impl From<Book> for ActiveModel {
    fn from(book: Book) -> Self {
        Self {
            book_id: NotSet,
            title: Set(book.title),
            genre_key: Set(book.genre.as_deref().map(genre_key)),
            genre: Set(book.genre),
            publish_date: Set(book.publish_date),
            price: Set(book.price),
            description: Set(book.description),
            author_id: Set(book.author_id),
            row_version: NotSet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::ActiveValue;

    fn sample() -> Book {
        Book {
            book_id: 0,
            title: "Midnight Rain".to_string(),
            genre: Some("Fantasy".to_string()),
            publish_date: NaiveDate::from_ymd_opt(2000, 12, 16)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            price: 14.95,
            description: None,
            author_id: 1,
            row_version: None,
        }
    }

    #[test]
    fn valid_book_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut book = sample();
        book.title = "   ".to_string();
        assert!(book.validate().is_err());
    }

    #[test]
    fn negative_price_and_missing_author_are_rejected() {
        let mut book = sample();
        book.price = -1.0;
        book.author_id = 0;
        let report = book.validate().unwrap_err();
        assert_eq!(report.iter().count(), 2);
    }

    #[test]
    fn deserializes_camel_case_with_date_only_publish_date() {
        let book: Book = serde_json::from_value(serde_json::json!({
            "title": "Lover Birds",
            "genre": "Romance",
            "publishDate": "2000-09-02",
            "price": 7.95,
            "authorId": 3
        }))
        .unwrap();
        assert_eq!(book.book_id, 0);
        assert_eq!(book.author_id, 3);
        assert_eq!(book.publish_date.to_string(), "2000-09-02 00:00:00");
        assert_eq!(book.row_version, None);
    }

    #[test]
    fn active_model_leaves_key_and_version_unset() {
        let mut book = sample();
        book.book_id = 42;
        book.row_version = Some(7);
        let active: ActiveModel = book.into();
        assert!(matches!(active.book_id, ActiveValue::NotSet));
        assert!(matches!(active.row_version, ActiveValue::NotSet));
        assert!(matches!(active.title, ActiveValue::Set(ref title) if title == "Midnight Rain"));
        assert!(matches!(active.genre_key, ActiveValue::Set(Some(ref key)) if key == "fantasy"));
    }

    #[test]
    fn genre_key_folds_non_ascii_letters() {
        assert_eq!(genre_key("Émigré"), "émigré");
        assert_eq!(genre_key("ÉMIGRÉ"), genre_key("émigré"));
        assert_eq!(genre_key("Sci-Fi"), "sci-fi");
    }
}

//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use crate::domain::{BookRepository, DomainError};
use crate::models::author::{self, Entity as AuthorEntity};
use crate::models::book::{self, ActiveModel, Column, Entity as BookEntity};
use crate::models::{Book, BookDetailDto, BookDto};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Books joined to their author, projected to the summary columns
    fn summaries() -> Select<BookEntity> {
        BookEntity::find()
            .select_only()
            .column(Column::Title)
            .column_as(author::Column::Name, "author")
            .column(Column::Genre)
            .inner_join(AuthorEntity)
            .order_by_asc(Column::BookId)
    }

    fn details() -> Select<BookEntity> {
        BookEntity::find()
            .select_only()
            .column(Column::Title)
            .column(Column::Genre)
            .column(Column::PublishDate)
            .column(Column::Price)
            .column(Column::Description)
            .column_as(author::Column::Name, "author")
            .inner_join(AuthorEntity)
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<BookDto>, DomainError> {
        let books = Self::summaries()
            .into_model::<BookDto>()
            .all(&self.db)
            .await?;
        Ok(books)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<BookDto>, DomainError> {
        let book = Self::summaries()
            .filter(Column::BookId.eq(id))
            .into_model::<BookDto>()
            .one(&self.db)
            .await?;
        Ok(book)
    }

    async fn find_details(&self, id: i32) -> Result<Option<BookDetailDto>, DomainError> {
        let book = Self::details()
            .filter(Column::BookId.eq(id))
            .into_model::<BookDetailDto>()
            .one(&self.db)
            .await?;
        Ok(book)
    }

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<BookDto>, DomainError> {
        let books = Self::summaries()
            .filter(Column::GenreKey.eq(book::genre_key(genre)))
            .into_model::<BookDto>()
            .all(&self.db)
            .await?;

        tracing::debug!("Genre '{}' matched {} books", genre, books.len());
        Ok(books)
    }

    async fn find_by_author(&self, author_id: i32) -> Result<Vec<BookDto>, DomainError> {
        let books = Self::summaries()
            .filter(Column::AuthorId.eq(author_id))
            .into_model::<BookDto>()
            .all(&self.db)
            .await?;
        Ok(books)
    }

    async fn find_by_publish_date(&self, day: NaiveDate) -> Result<Vec<BookDto>, DomainError> {
        // Half-open range over the whole day keeps the column comparable as stored.
        // The last day chrono can represent has no successor to bound it.
        let start = day.and_time(NaiveTime::MIN);
        let end = day
            .succ_opt()
            .ok_or(DomainError::NotFound)?
            .and_time(NaiveTime::MIN);

        let books = Self::summaries()
            .filter(Column::PublishDate.gte(start))
            .filter(Column::PublishDate.lt(end))
            .into_model::<BookDto>()
            .all(&self.db)
            .await?;
        Ok(books)
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        let txn = self.db.begin().await?;

        let mut new_book: ActiveModel = book.into();
        new_book.row_version = Set(1);
        let model = new_book.insert(&txn).await?;

        txn.commit().await?;
        tracing::info!("Created book {} '{}'", model.book_id, model.title);
        Ok(Book::from(model))
    }

    async fn update(&self, book: Book) -> Result<(), DomainError> {
        let id = book.book_id;
        let expected_version = book.row_version;

        let txn = self.db.begin().await?;

        let mut update = BookEntity::update_many()
            .set(ActiveModel::from(book))
            .col_expr(Column::RowVersion, Expr::col(Column::RowVersion).add(1))
            .filter(Column::BookId.eq(id));
        if let Some(version) = expected_version {
            update = update.filter(Column::RowVersion.eq(version));
        }

        let result = update.exec(&txn).await?;
        if result.rows_affected == 0 {
            // Nothing written: either the row vanished or its version moved on.
            let still_exists = BookEntity::find_by_id(id).count(&txn).await? > 0;
            txn.rollback().await?;

            return Err(if still_exists {
                DomainError::Concurrency { id }
            } else {
                DomainError::NotFound
            });
        }

        txn.commit().await?;
        tracing::info!("Updated book {}", id);
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<Book, DomainError> {
        let txn = self.db.begin().await?;

        let model = BookEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;
        model.clone().delete(&txn).await?;

        txn.commit().await?;
        tracing::info!("Deleted book {}", id);
        Ok(Book::from(model))
    }
}

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, Set, Statement,
};

use crate::models::book;

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    run_migrations(&db).await?;

    Ok(db)
}

/// Idempotent schema setup, safe to run on every start.
async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            author_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            book_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            genre TEXT,
            genre_key TEXT,
            publish_date TEXT NOT NULL,
            price REAL NOT NULL DEFAULT 0,
            description TEXT,
            author_id INTEGER NOT NULL,
            row_version INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY (author_id) REFERENCES authors(author_id) ON DELETE CASCADE
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)",
        "CREATE INDEX IF NOT EXISTS idx_books_publish_date ON books(publish_date)",
    ];

    for sql in statements {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_owned(),
        ))
        .await?;
    }

    // Databases created before genre keys existed. SQLite has no
    // ADD COLUMN IF NOT EXISTS, so a duplicate column error is ignored.
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE books ADD COLUMN genre_key TEXT".to_owned(),
        ))
        .await;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_books_genre_key ON books(genre_key)".to_owned(),
    ))
    .await?;
    backfill_genre_keys(db).await?;

    tracing::debug!("Database schema is up to date");
    Ok(())
}

/// Fills in the lookup key of books stored without one.
async fn backfill_genre_keys(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stale = book::Entity::find()
        .filter(book::Column::Genre.is_not_null())
        .filter(book::Column::GenreKey.is_null())
        .all(db)
        .await?;

    let count = stale.len();
    for model in stale {
        let key = model.genre.as_deref().map(book::genre_key);
        let mut active: book::ActiveModel = model.into();
        active.genre_key = Set(key);
        active.update(db).await?;
    }

    if count > 0 {
        tracing::info!("Backfilled genre keys for {} books", count);
    }
    Ok(())
}

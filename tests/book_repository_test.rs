use books_api::db;
use books_api::domain::{BookRepository, DomainError};
use books_api::infrastructure::SeaOrmBookRepository;
use books_api::models::{Book, author};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

// Helper to create a test author
async fn create_test_author(db: &DatabaseConnection, name: &str) -> i32 {
    let author = author::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    let res = author::Entity::insert(author)
        .exec(db)
        .await
        .expect("Failed to create author");
    res.last_insert_id
}

fn book(title: &str, genre: &str, published: (i32, u32, u32, u32), author_id: i32) -> Book {
    let (y, m, d, h) = published;
    Book {
        book_id: 0,
        title: title.to_string(),
        genre: Some(genre.to_string()),
        publish_date: NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 15, 0)
            .unwrap(),
        price: 10.0,
        description: None,
        author_id,
        row_version: None,
    }
}

#[tokio::test]
async fn test_create_assigns_id_and_version() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Le Guin, Ursula").await;
    let repo = SeaOrmBookRepository::new(db);

    let created = repo
        .create(book("The Dispossessed", "Sci-Fi", (1974, 5, 1, 9), author_id))
        .await
        .expect("Create failed");

    assert!(created.book_id > 0);
    assert_eq!(created.row_version, Some(1));

    let dto = repo
        .find_by_id(created.book_id)
        .await
        .unwrap()
        .expect("Book should exist");
    assert_eq!(dto.title, "The Dispossessed");
    assert_eq!(dto.author, "Le Guin, Ursula");
    assert_eq!(dto.genre.as_deref(), Some("Sci-Fi"));
}

#[tokio::test]
async fn test_genre_match_is_exact_apart_from_case() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Author").await;
    let repo = SeaOrmBookRepository::new(db);

    repo.create(book("A", "Sci-Fi", (2001, 1, 1, 0), author_id)).await.unwrap();
    repo.create(book("B", "SCI-FI", (2001, 1, 2, 0), author_id)).await.unwrap();
    repo.create(book("C", "Sci-Fi Classics", (2001, 1, 3, 0), author_id)).await.unwrap();

    let books = repo.find_by_genre("sci-fi").await.unwrap();
    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[tokio::test]
async fn test_genre_match_folds_non_ascii_letters() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Author").await;
    let repo = SeaOrmBookRepository::new(db);

    repo.create(book("Exile", "Émigré", (2019, 2, 3, 0), author_id)).await.unwrap();
    repo.create(book("Plain", "emigre", (2019, 2, 4, 0), author_id)).await.unwrap();

    for query in ["émigré", "ÉMIGRÉ", "Émigré"] {
        let books = repo.find_by_genre(query).await.unwrap();
        let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Exile"], "{}", query);
    }
}

#[tokio::test]
async fn test_publish_date_on_last_representable_day() {
    let db = setup_test_db().await;
    let repo = SeaOrmBookRepository::new(db);

    assert!(matches!(
        repo.find_by_publish_date(NaiveDate::MAX).await,
        Err(DomainError::NotFound)
    ));
}

#[tokio::test]
async fn test_publish_date_covers_whole_day() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Author").await;
    let repo = SeaOrmBookRepository::new(db);

    repo.create(book("Dawn", "Any", (2020, 5, 1, 0), author_id)).await.unwrap();
    repo.create(book("Dusk", "Any", (2020, 5, 1, 23), author_id)).await.unwrap();
    repo.create(book("Next", "Any", (2020, 5, 2, 0), author_id)).await.unwrap();
    repo.create(book("Before", "Any", (2020, 4, 30, 23), author_id)).await.unwrap();

    let day = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
    let books = repo.find_by_publish_date(day).await.unwrap();
    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Dawn", "Dusk"]);
}

#[tokio::test]
async fn test_update_bumps_version_and_checks_it() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Author").await;
    let repo = SeaOrmBookRepository::new(db);

    let created = repo
        .create(book("Draft", "Any", (2010, 1, 1, 12), author_id))
        .await
        .unwrap();

    let mut edit = created.clone();
    edit.title = "Final".to_string();
    repo.update(edit.clone()).await.expect("Update failed");

    // `edit` still carries version 1, which is now stale.
    edit.title = "Overwritten".to_string();
    let err = repo.update(edit.clone()).await.unwrap_err();
    assert!(matches!(err, DomainError::Concurrency { id } if id == created.book_id));

    // Without an expected version the write goes through.
    edit.row_version = None;
    edit.title = "Forced".to_string();
    repo.update(edit).await.expect("Unversioned update failed");

    let deleted = repo.delete(created.book_id).await.unwrap();
    assert_eq!(deleted.title, "Forced");
    assert_eq!(deleted.row_version, Some(3));
}

#[tokio::test]
async fn test_update_and_delete_missing_book() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Author").await;
    let repo = SeaOrmBookRepository::new(db);

    let mut missing = book("Missing", "Any", (2010, 1, 1, 12), author_id);
    missing.book_id = 42;

    assert!(matches!(
        repo.update(missing).await,
        Err(DomainError::NotFound)
    ));
    assert!(matches!(repo.delete(42).await, Err(DomainError::NotFound)));
    assert!(repo.find_details(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_details_projection() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Herbert, Frank").await;
    let repo = SeaOrmBookRepository::new(db);

    let mut dune = book("Dune", "Sci-Fi", (1965, 8, 1, 0), author_id);
    dune.price = 9.99;
    dune.description = Some("A spice planet story.".to_string());
    let created = repo.create(dune).await.unwrap();

    let details = repo.find_details(created.book_id).await.unwrap().unwrap();
    assert_eq!(details.title, "Dune");
    assert_eq!(details.author, "Herbert, Frank");
    assert_eq!(details.price, 9.99);
    assert_eq!(details.description.as_deref(), Some("A spice planet story."));
    assert_eq!(details.publish_date.to_string(), "1965-08-01 00:15:00");

    let by_author = repo.find_by_author(author_id).await.unwrap();
    assert_eq!(by_author.len(), 1);
    assert!(repo.find_by_author(author_id + 1).await.unwrap().is_empty());
}

use chrono::NaiveDate;
use sea_orm::*;

use crate::models::{author, book};

const AUTHORS: &[&str] = &[
    "Ralls, Kim",
    "Corets, Eva",
    "Randall, Cynthia",
    "Thurman, Paula",
];

// (title, genre, (year, month, day), price, description, author index)
const BOOKS: &[(&str, &str, (i32, u32, u32), f64, &str, usize)] = &[
    (
        "Midnight Rain",
        "Fantasy",
        (2000, 12, 16),
        14.95,
        "A former architect battles an evil sorceress.",
        0,
    ),
    (
        "Maeve Ascendant",
        "Fantasy",
        (2000, 11, 17),
        12.95,
        "After the collapse of a nanotechnology society, the young survivors lay the foundation for a new society.",
        1,
    ),
    (
        "The Sundered Grail",
        "Fantasy",
        (2001, 9, 10),
        12.95,
        "The two daughters of Maeve battle for control of England.",
        1,
    ),
    (
        "Lover Birds",
        "Romance",
        (2000, 9, 2),
        7.95,
        "When Carla meets Paul at an ornithology conference, tempers fly.",
        2,
    ),
    (
        "Splish Splash",
        "Romance",
        (2000, 11, 2),
        6.95,
        "A deep sea diver finds true love 20,000 leagues beneath the sea.",
        3,
    ),
];

/// Insert the demo catalogue. Does nothing when authors already exist.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if author::Entity::find().count(db).await? > 0 {
        tracing::info!("Catalogue already populated, skipping seed");
        return Ok(());
    }

    let txn = db.begin().await?;

    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for name in AUTHORS {
        let author = author::ActiveModel {
            name: Set((*name).to_owned()),
            ..Default::default()
        };
        let res = author::Entity::insert(author).exec(&txn).await?;
        author_ids.push(res.last_insert_id);
    }

    for (title, genre, (y, m, d), price, description, author_idx) in BOOKS {
        let publish_date = NaiveDate::from_ymd_opt(*y, *m, *d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| DbErr::Custom(format!("invalid seed date for '{}'", title)))?;

        let book = book::ActiveModel {
            title: Set((*title).to_owned()),
            genre: Set(Some((*genre).to_owned())),
            genre_key: Set(Some(book::genre_key(genre))),
            publish_date: Set(publish_date),
            price: Set(*price),
            description: Set(Some((*description).to_owned())),
            author_id: Set(author_ids[*author_idx]),
            row_version: Set(1),
            ..Default::default()
        };
        book::Entity::insert(book).exec(&txn).await?;
    }

    txn.commit().await?;
    tracing::info!(
        "Seeded {} authors and {} books",
        AUTHORS.len(),
        BOOKS.len()
    );
    Ok(())
}

pub mod author;
pub mod book;
pub mod dto;

pub use book::Book;
pub use dto::{BookDetailDto, BookDto, BookLookup};

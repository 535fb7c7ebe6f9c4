//! Data models for the Local Library catalog

pub mod book;
pub mod genre;

pub use book::BookShort;
pub use genre::{Genre, GenreDetail, GenreForm};

//! Book model (read-only from the genre pages)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book summary as listed on genre pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    /// Genre the book is filed under, if any
    pub genre_id: Option<i32>,
}

impl BookShort {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

//! Books repository (PostgreSQL)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookRepository;
use crate::{error::AppResult, models::BookShort};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for BooksRepository {
    async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<BookShort>> {
        let rows = sqlx::query_as::<_, BookShort>(
            "SELECT id, title, summary, genre_id FROM books WHERE genre_id = $1 ORDER BY title",
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

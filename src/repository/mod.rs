//! Repository layer for catalog records
//!
//! Services talk to the store through [`GenreRepository`] and
//! [`BookRepository`]; the PostgreSQL and in-memory backends both implement
//! them.

pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{BookShort, Genre},
};

/// Result of an insert guarded by the unique genre name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Genre),
    /// A genre with that name was already there
    Existing(Genre),
}

/// Result of a rename guarded by the unique genre name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed(Genre),
    /// Another genre already holds the name; nothing was written
    Conflict(Genre),
    /// No genre with that id
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// All genres ordered by name
    async fn list(&self) -> AppResult<Vec<Genre>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Genre>>;

    /// Exact name match
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;

    /// Insert `name` unless a genre already carries it, as one atomic write
    async fn create_unique(&self, name: &str) -> AppResult<CreateOutcome>;

    /// Replace the name of genre `id` unless another genre already carries it
    async fn rename_unique(&self, id: i32, name: &str) -> AppResult<RenameOutcome>;

    /// Returns false when no row was removed
    async fn delete(&self, id: i32) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Books filed under a genre, ordered by title
    async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<BookShort>>;
}

/// Handle on the record store shared by all services
#[derive(Clone)]
pub struct Repository {
    pub genres: Arc<dyn GenreRepository>,
    pub books: Arc<dyn BookRepository>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Repository backed by PostgreSQL
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Repository backed by an in-process store
    pub fn in_memory(store: memory::MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            genres: store.clone(),
            books: store,
            pool: None,
        }
    }

    /// Assemble a repository from arbitrary backends
    pub fn from_parts(genres: Arc<dyn GenreRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self {
            genres,
            books,
            pool: None,
        }
    }

    /// Check that the store answers queries
    pub async fn ping(&self) -> AppResult<()> {
        match &self.pool {
            Some(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            None => {
                self.genres.count().await?;
            }
        }
        Ok(())
    }
}

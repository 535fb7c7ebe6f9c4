//! In-process record store
//!
//! Used by the `memory` backend and by the tests. All writes go through one
//! lock, so the unique-name guard is atomic here too.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookRepository, CreateOutcome, GenreRepository, RenameOutcome};
use crate::{
    error::{AppError, AppResult},
    models::{BookShort, Genre},
};

#[derive(Default)]
struct State {
    genres: BTreeMap<i32, Genre>,
    books: BTreeMap<i32, BookShort>,
    next_genre_id: i32,
    next_book_id: i32,
}

impl State {
    fn holder_of(&self, name: &str) -> Option<&Genre> {
        self.genres.values().find(|g| g.name == name)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a new book, optionally under a genre
    pub async fn add_book(&self, title: &str, genre_id: Option<i32>) -> BookShort {
        let mut state = self.state.write().await;
        state.next_book_id += 1;
        let book = BookShort {
            id: state.next_book_id,
            title: title.to_string(),
            summary: None,
            genre_id,
        };
        state.books.insert(book.id, book.clone());
        book
    }

    /// Move a book to another genre (or none)
    pub async fn set_book_genre(&self, book_id: i32, genre_id: Option<i32>) -> AppResult<()> {
        let mut state = self.state.write().await;
        let book = state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;
        book.genre_id = genre_id;
        Ok(())
    }
}

#[async_trait]
impl GenreRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let state = self.state.read().await;
        let mut genres: Vec<Genre> = state.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Genre>> {
        Ok(self.state.read().await.genres.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        Ok(self.state.read().await.holder_of(name).cloned())
    }

    async fn create_unique(&self, name: &str) -> AppResult<CreateOutcome> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.holder_of(name) {
            return Ok(CreateOutcome::Existing(existing.clone()));
        }
        state.next_genre_id += 1;
        let genre = Genre {
            id: state.next_genre_id,
            name: name.to_string(),
        };
        state.genres.insert(genre.id, genre.clone());
        Ok(CreateOutcome::Created(genre))
    }

    async fn rename_unique(&self, id: i32, name: &str) -> AppResult<RenameOutcome> {
        let mut state = self.state.write().await;
        if let Some(holder) = state.holder_of(name) {
            if holder.id != id {
                return Ok(RenameOutcome::Conflict(holder.clone()));
            }
        }
        match state.genres.get_mut(&id) {
            Some(genre) => {
                genre.name = name.to_string();
                Ok(RenameOutcome::Renamed(genre.clone()))
            }
            None => Ok(RenameOutcome::Missing),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.books.values().any(|b| b.genre_id == Some(id)) {
            return Err(AppError::Store(format!(
                "genre {} is still referenced by books",
                id
            )));
        }
        Ok(state.genres.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.genres.len() as i64)
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<BookShort>> {
        let state = self.state.read().await;
        let mut books: Vec<BookShort> = state
            .books
            .values()
            .filter(|b| b.genre_id == Some(genre_id))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }
}

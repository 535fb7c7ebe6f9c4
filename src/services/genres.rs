//! Genre service
//!
//! Enforces what the store does not: the one-genre-per-name rule on create and
//! update, and the no-books rule on delete. Every business branch resolves to
//! an outcome value; only store failures come back as errors.

use crate::{
    error::{AppError, AppResult},
    models::{
        genre::{GenreForm, RawGenreForm},
        BookShort, Genre, GenreDetail,
    },
    repository::{CreateOutcome, RenameOutcome, Repository},
};

use super::validation::{validate_genre_form, FieldError, Validated};

/// What a create/update submission resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Show the form again with the sanitized value and its errors
    Redisplay { form: GenreForm, errors: Vec<FieldError> },
    /// Go to the page of the created, updated or pre-existing genre
    Redirect(String),
}

/// What the delete confirmation page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteView {
    Confirm { genre: Genre, books: Vec<BookShort> },
    /// Nothing to delete; go back to the list
    Missing,
}

/// What a delete submission resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Books still reference the genre; nothing was removed
    Blocked { genre: Genre, books: Vec<BookShort> },
    /// Already gone
    Missing,
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all genres, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.repository.genres.count().await
    }

    /// Fetch a genre and its books concurrently
    async fn with_books(&self, id: i32) -> AppResult<(Option<Genre>, Vec<BookShort>)> {
        tokio::try_join!(
            self.repository.genres.get_by_id(id),
            self.repository.books.list_by_genre(id),
        )
    }

    /// Genre detail page
    pub async fn detail(&self, id: i32) -> AppResult<GenreDetail> {
        let (genre, books) = self.with_books(id).await?;
        let genre = genre.ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        tracing::debug!(genre_id = id, books = books.len(), "Genre detail");
        Ok(GenreDetail { genre, books })
    }

    /// Genre to pre-fill the update form with
    pub async fn edit_form(&self, id: i32) -> AppResult<Genre> {
        self.repository
            .genres
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    /// Handle a create submission
    pub async fn create(&self, raw: &RawGenreForm) -> AppResult<FormOutcome> {
        let form = match validate_genre_form(raw) {
            Validated::Valid(form) => form,
            Validated::Invalid { form, errors } => {
                tracing::debug!(errors = errors.len(), "Genre create form rejected");
                return Ok(FormOutcome::Redisplay { form, errors });
            }
        };

        match self.repository.genres.create_unique(&form.name).await? {
            CreateOutcome::Created(genre) => {
                tracing::info!(genre_id = genre.id, name = %genre.name, "Genre created");
                Ok(FormOutcome::Redirect(genre.url()))
            }
            CreateOutcome::Existing(genre) => {
                tracing::info!(
                    genre_id = genre.id,
                    name = %genre.name,
                    "Genre already exists, redirecting to it"
                );
                Ok(FormOutcome::Redirect(genre.url()))
            }
        }
    }

    /// Handle an update submission for genre `id`.
    ///
    /// When another genre already carries the submitted name, nothing is
    /// written and the redirect goes to that genre instead, even if `id`
    /// itself no longer exists.
    pub async fn update(&self, id: i32, raw: &RawGenreForm) -> AppResult<FormOutcome> {
        let form = match validate_genre_form(raw) {
            Validated::Valid(form) => form,
            Validated::Invalid { form, errors } => {
                tracing::debug!(genre_id = id, errors = errors.len(), "Genre update form rejected");
                return Ok(FormOutcome::Redisplay { form, errors });
            }
        };

        match self.repository.genres.rename_unique(id, &form.name).await? {
            RenameOutcome::Renamed(genre) => {
                tracing::info!(genre_id = genre.id, name = %genre.name, "Genre updated");
                Ok(FormOutcome::Redirect(genre.url()))
            }
            RenameOutcome::Conflict(existing) => {
                tracing::info!(
                    genre_id = id,
                    existing_id = existing.id,
                    name = %existing.name,
                    "Genre name already taken, redirecting to holder"
                );
                Ok(FormOutcome::Redirect(existing.url()))
            }
            // The name check wins over the missing target, whichever the
            // backend evaluated first
            RenameOutcome::Missing => match self.repository.genres.find_by_name(&form.name).await? {
                Some(existing) => {
                    tracing::info!(
                        genre_id = id,
                        existing_id = existing.id,
                        "Genre to update is gone, redirecting to name holder"
                    );
                    Ok(FormOutcome::Redirect(existing.url()))
                }
                None => Err(AppError::NotFound("Genre not found".to_string())),
            },
        }
    }

    /// Delete confirmation page
    pub async fn delete_form(&self, id: i32) -> AppResult<DeleteView> {
        match self.with_books(id).await? {
            (Some(genre), books) => Ok(DeleteView::Confirm { genre, books }),
            (None, _) => {
                tracing::debug!(genre_id = id, "Delete requested for missing genre");
                Ok(DeleteView::Missing)
            }
        }
    }

    /// Handle a delete submission; refused while books reference the genre
    pub async fn delete(&self, id: i32) -> AppResult<DeleteOutcome> {
        let (genre, books) = self.with_books(id).await?;
        let genre = match genre {
            Some(genre) => genre,
            None => {
                tracing::debug!(genre_id = id, "Genre already deleted");
                return Ok(DeleteOutcome::Missing);
            }
        };

        if !books.is_empty() {
            tracing::warn!(
                genre_id = id,
                books = books.len(),
                "Genre deletion refused: books still reference it"
            );
            return Ok(DeleteOutcome::Blocked { genre, books });
        }

        if self.repository.genres.delete(id).await? {
            tracing::info!(genre_id = id, name = %genre.name, "Genre deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::Missing)
        }
    }
}

//! Genres repository (PostgreSQL)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{CreateOutcome, GenreRepository, RenameOutcome};
use crate::{
    error::{AppError, AppResult},
    models::Genre,
};

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Existing holder of `name`, which must be there after a conflict
    async fn conflicting(&self, name: &str) -> AppResult<Genre> {
        self.find_by_name(name).await?.ok_or_else(|| {
            AppError::Internal(format!("Genre name '{}' conflicted but no holder was found", name))
        })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[derive(sqlx::FromRow)]
struct UpsertRow {
    id: i32,
    name: String,
    created: bool,
}

#[async_trait]
impl GenreRepository for GenresRepository {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_unique(&self, name: &str) -> AppResult<CreateOutcome> {
        let row = sqlx::query_as::<_, UpsertRow>(
            r#"
            WITH inserted AS (
                INSERT INTO genres (name) VALUES ($1)
                ON CONFLICT (name) DO NOTHING
                RETURNING id, name
            )
            SELECT id, name, TRUE AS created FROM inserted
            UNION ALL
            SELECT id, name, FALSE AS created FROM genres
            WHERE name = $1 AND NOT EXISTS (SELECT 1 FROM inserted)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let genre = Genre { id: row.id, name: row.name };
                Ok(if row.created {
                    CreateOutcome::Created(genre)
                } else {
                    CreateOutcome::Existing(genre)
                })
            }
            // The conflicting row was committed after this statement's snapshot
            None => Ok(CreateOutcome::Existing(self.conflicting(name).await?)),
        }
    }

    async fn rename_unique(&self, id: i32, name: &str) -> AppResult<RenameOutcome> {
        let result = sqlx::query_as::<_, Genre>(
            "UPDATE genres SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(genre)) => Ok(RenameOutcome::Renamed(genre)),
            Ok(None) => Ok(RenameOutcome::Missing),
            Err(e) if is_unique_violation(&e) => {
                Ok(RenameOutcome::Conflict(self.conflicting(name).await?))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

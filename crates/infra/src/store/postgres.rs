//! Postgres-backed note store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tokio::time::timeout;

use notely_core::{NewNote, Note};
use notely_notes::{NoteStore, StoreError};

/// Note store over a shared connection pool.
///
/// The pool is created once at startup and is safe for concurrent use; this
/// adapter adds a bounded operation timeout around every statement. No
/// operation spans more than a single statement.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
    operation_timeout: Duration,
}

impl PgNoteStore {
    pub fn new(pool: PgPool, operation_timeout: Duration) -> Self {
        Self {
            pool,
            operation_timeout,
        }
    }

    fn map_row(row: &PgRow) -> Result<Note, StoreError> {
        Ok(Note {
            id: row.try_get("id").map_err(database)?,
            title: row.try_get("title").map_err(database)?,
            text: row.try_get("text").map_err(database)?,
            updated_at: row.try_get("updated_at").map_err(database)?,
            created_at: row.try_get("created_at").map_err(database)?,
        })
    }
}

fn database(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn find(&self, id: i64) -> Result<Option<Note>, StoreError> {
        let query = sqlx::query(
            "SELECT id, title, text, updated_at, created_at FROM notes WHERE id = $1",
        )
        .bind(id);

        let row = timeout(self.operation_timeout, query.fetch_optional(&self.pool))
            .await
            .map_err(|_| StoreError::Timeout(self.operation_timeout))?
            .map_err(database)?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn insert(
        &self,
        new_note: &NewNote,
        timestamp: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let query = sqlx::query(
            "INSERT INTO notes (title, text, updated_at, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&new_note.title)
        .bind(&new_note.text)
        .bind(timestamp)
        .bind(timestamp);

        let row = timeout(self.operation_timeout, query.fetch_one(&self.pool))
            .await
            .map_err(|_| StoreError::Timeout(self.operation_timeout))?
            .map_err(database)?;

        row.try_get("id").map_err(database)
    }
}

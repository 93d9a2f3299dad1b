//! Relational store port.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use notely_core::{NewNote, Note};

/// Failure of a store operation.
///
/// Absence of a row is **not** represented here; `find` reports it as
/// `Ok(None)`. Every variant is a persistent dependency failure that callers
/// surface rather than swallow.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation did not complete within the configured timeout.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The database rejected or failed the operation.
    #[error("database failure: {0}")]
    Database(String),
}

/// Parameterized operations against the notes table.
///
/// Implementations are safe for concurrent use and apply their own bounded
/// operation timeout to every call.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fetch a note by id. A missing row is `Ok(None)`.
    async fn find(&self, id: i64) -> Result<Option<Note>, StoreError>;

    /// Insert a note with the given creation timestamp (used for both
    /// `created_at` and `updated_at`) and return the assigned id.
    async fn insert(&self, new_note: &NewNote, timestamp: DateTime<Utc>)
    -> Result<i64, StoreError>;
}

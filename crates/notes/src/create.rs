//! Create command handler.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use notely_core::NewNote;

use crate::store::{NoteStore, StoreError};

/// Failure of a create.
#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates shape (done upstream by deserialization) and persists a new
/// note in a single insert.
///
/// Timestamps are assigned here, once, with `created_at == updated_at`.
/// There is deliberately no cache write: a newly created note stays
/// cache-cold until its first read, and readers may observe "not found"
/// until the async create has been processed.
pub struct CreateHandler {
    store: Arc<dyn NoteStore>,
}

impl CreateHandler {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, new_note: NewNote) -> Result<(), CreateError> {
        let now = Utc::now();
        let id = self.store.insert(&new_note, now).await?;
        debug!(id, title = %new_note.title, "note created");
        Ok(())
    }
}

//! In-memory note store for tests/dev.

use std::collections::BTreeMap;
use std::sync::{
    Mutex,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use notely_core::{NewNote, Note};
use notely_notes::{NoteStore, StoreError};

/// In-memory store with the same id semantics as the real table: ids are
/// assigned monotonically starting at 1, so 0 never identifies a row.
#[derive(Default)]
pub struct InMemoryNoteStore {
    notes: Mutex<BTreeMap<i64, Note>>,
    next_id: AtomicI64,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row, in id order.
    pub fn all(&self) -> Vec<Note> {
        self.notes.lock().unwrap().values().cloned().collect()
    }

    /// Seed a note directly, returning it with its assigned id.
    pub fn seed(&self, title: &str, text: &str) -> Note {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let note = Note {
            id,
            title: title.to_string(),
            text: text.to_string(),
            updated_at: now,
            created_at: now,
        };
        self.notes.lock().unwrap().insert(id, note.clone());
        note
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn find(&self, id: i64) -> Result<Option<Note>, StoreError> {
        Ok(self.notes.lock().unwrap().get(&id).cloned())
    }

    async fn insert(
        &self,
        new_note: &NewNote,
        timestamp: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let note = Note {
            id,
            title: new_note.title.clone(),
            text: new_note.text.clone(),
            updated_at: timestamp,
            created_at: timestamp,
        };
        self.notes.lock().unwrap().insert(id, note);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let store = InMemoryNoteStore::new();
        let now = Utc::now();

        let first = store
            .insert(
                &NewNote {
                    title: "a".into(),
                    text: "a".into(),
                },
                now,
            )
            .await
            .unwrap();
        let second = store
            .insert(
                &NewNote {
                    title: "b".into(),
                    text: "b".into(),
                },
                now,
            )
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(store.all().len(), 2);
    }

    #[tokio::test]
    async fn find_misses_are_none() {
        let store = InMemoryNoteStore::new();
        assert!(store.find(0).await.unwrap().is_none());
        assert!(store.find(99).await.unwrap().is_none());
    }
}

//! In-memory note cache for tests/dev.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use notely_notes::{CacheError, NoteCache};

/// In-memory cache with real TTL semantics: an entry past its deadline is
/// gone, exactly as it would be in Redis.
#[derive(Default)]
pub struct InMemoryNoteCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryNoteCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteCache for InMemoryNoteCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, deadline)) if Instant::now() < *deadline => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let deadline = Instant::now() + ttl;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), deadline));
        Ok(())
    }
}

//! Read-through lookup over cache and store.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use notely_core::Note;

use crate::cache::{NoteCache, note_key};
use crate::store::{NoteStore, StoreError};

/// Failure of a lookup.
///
/// Only store failures surface; cache failures are recovered locally by
/// degrading to the store.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read-through cache orchestration: cache first, store on a miss, cache
/// populated best-effort on a store hit.
///
/// Owns neither copy of the data; the store holds the durable one, the cache
/// a disposable one that lives until its TTL expires. Entries can therefore
/// be stale until expiry — there is no invalidation, and no update path that
/// would need it.
pub struct LookupService {
    store: Arc<dyn NoteStore>,
    cache: Arc<dyn NoteCache>,
    cache_ttl: Duration,
}

impl LookupService {
    pub fn new(store: Arc<dyn NoteStore>, cache: Arc<dyn NoteCache>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache,
            cache_ttl,
        }
    }

    /// Find a note by id. `Ok(None)` means the note does not exist anywhere.
    ///
    /// Cache unavailability and corrupt cache entries never fail the read;
    /// both are logged and treated as a miss. Concurrent misses for the same
    /// id are not coalesced, each one queries the store.
    pub async fn find(&self, id: i64) -> Result<Option<Note>, LookupError> {
        let key = note_key(id);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Note>(&raw) {
                Ok(note) => {
                    debug!(%key, "cache hit");
                    return Ok(Some(note));
                }
                Err(err) => warn!(%key, error = %err, "discarding corrupt cache entry"),
            },
            Ok(None) => {}
            Err(err) => warn!(%key, error = %err, "cache read failed, falling back to store"),
        }

        let Some(note) = self.store.find(id).await? else {
            return Ok(None);
        };

        match serde_json::to_string(&note) {
            Ok(raw) => {
                if let Err(err) = self.cache.set(&key, &raw, self.cache_ttl).await {
                    warn!(%key, error = %err, "cache write failed");
                }
            }
            Err(err) => warn!(%key, error = %err, "note not serializable for cache"),
        }

        Ok(Some(note))
    }
}

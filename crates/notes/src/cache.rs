//! Key-value cache port.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Cache key for a note id.
pub fn note_key(id: i64) -> String {
    format!("notes.{id}")
}

/// Failure of a cache operation.
///
/// All cache failures are transient dependency errors: the lookup path logs
/// them and degrades to the store, it never fails a read because of them.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The operation did not complete within the configured timeout.
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// The cache backend failed the operation.
    #[error("cache backend failure: {0}")]
    Backend(String),
}

/// Get/set-with-TTL operations against the cache backend.
///
/// Values are opaque strings; serialization is the caller's concern.
/// Implementations are safe for concurrent use and apply their own bounded
/// operation timeout to every call.
#[async_trait]
pub trait NoteCache: Send + Sync {
    /// Read a key. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a key with the given time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_key_is_prefixed_by_entity() {
        assert_eq!(note_key(42), "notes.42");
        assert_eq!(note_key(1), "notes.1");
    }
}

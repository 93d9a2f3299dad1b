//! Redis-backed note cache.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tokio::time::timeout;

use notely_notes::{CacheError, NoteCache};

/// Note cache over a multiplexed Redis connection.
///
/// The connection is established once at startup (with a bounded ping) and
/// cloned per operation; every command runs under the configured operation
/// timeout. Values are written with `SET .. EX`, so expiry is enforced by
/// the backend.
#[derive(Clone)]
pub struct RedisNoteCache {
    conn: MultiplexedConnection,
    operation_timeout: Duration,
}

impl RedisNoteCache {
    /// Connect and verify the backend with a `PING` bounded by
    /// `ping_timeout`.
    pub async fn connect(
        url: &str,
        ping_timeout: Duration,
        operation_timeout: Duration,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(backend)?;

        let mut conn = timeout(ping_timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| CacheError::Timeout(ping_timeout))?
            .map_err(backend)?;

        timeout(
            ping_timeout,
            redis::cmd("PING").query_async::<_, String>(&mut conn),
        )
        .await
        .map_err(|_| CacheError::Timeout(ping_timeout))?
        .map_err(backend)?;

        Ok(Self {
            conn,
            operation_timeout,
        })
    }
}

fn backend(err: redis::RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}

#[async_trait]
impl NoteCache for RedisNoteCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        timeout(
            self.operation_timeout,
            redis::cmd("GET").arg(key).query_async::<_, Option<String>>(&mut conn),
        )
        .await
        .map_err(|_| CacheError::Timeout(self.operation_timeout))?
        .map_err(backend)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // EX takes whole seconds; never round a positive TTL down to zero.
        let seconds = ttl.as_secs().max(1);
        timeout(
            self.operation_timeout,
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(seconds)
                .query_async::<_, ()>(&mut conn),
        )
        .await
        .map_err(|_| CacheError::Timeout(self.operation_timeout))?
        .map_err(backend)
    }
}

//! `notely-infra` — infrastructure adapters.
//!
//! Implements the `notely-notes` storage/cache ports against Postgres and
//! Redis, the `notely-events` queue contract against Redis Streams, and
//! provides in-memory counterparts for tests and dev wiring. Connection
//! handles are created once at startup and shared; every operation runs
//! under its configured timeout.

pub mod cache;
pub mod config;
pub mod queue;
pub mod schema;
pub mod store;

pub use cache::{InMemoryNoteCache, RedisNoteCache};
pub use config::{CacheConfig, DatabaseConfig, HttpConfig, MessagingConfig};
pub use queue::{QueueSetupError, RedisStreamsQueue, RedisStreamsSubscription};
pub use store::{InMemoryNoteStore, PgNoteStore};

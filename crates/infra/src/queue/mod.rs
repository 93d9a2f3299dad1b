//! Queue transport implementations.

mod redis_streams;

pub use redis_streams::{QueueSetupError, RedisStreamsQueue, RedisStreamsSubscription};

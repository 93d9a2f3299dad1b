//! `notely-messaging` — the queue-consumer side of the notes service.

pub mod consumer;

pub use consumer::{ConsumerError, NoteConsumer};

//! Cache adapters for the `NoteCache` port.

mod memory;
mod redis;

pub use memory::InMemoryNoteCache;
pub use redis::RedisNoteCache;

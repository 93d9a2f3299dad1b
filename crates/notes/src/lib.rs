//! `notely-notes` — the business layer shared by the HTTP and messaging
//! processes.
//!
//! Storage and cache are reached through the ports in [`store`] and
//! [`cache`]; adapters live in `notely-infra`. Components take their
//! dependencies at construction time so every test can wire its own
//! instances.

pub mod cache;
pub mod create;
pub mod lookup;
pub mod store;

pub use cache::{CacheError, NoteCache, note_key};
pub use create::{CreateError, CreateHandler};
pub use lookup::{LookupError, LookupService};
pub use store::{NoteStore, StoreError};

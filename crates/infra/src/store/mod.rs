//! Store adapters for the `NoteStore` port.

mod memory;
mod postgres;

pub use memory::InMemoryNoteStore;
pub use postgres::PgNoteStore;

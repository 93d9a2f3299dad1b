//! `notely-events` — event decoding and queue transport abstractions.
//!
//! The wire format is a JSON envelope `{"type": ..., "data": ...}`. Decoding
//! dispatches on `type` into a discriminated [`NoteEvent`] in a single pass;
//! there is no intermediate dynamically-typed value.
//!
//! The queue side mirrors the transport-agnostic bus contract: a
//! [`Publisher`] half, a pull [`Subscription`] half, and per-message
//! [`Delivery`] values carrying their own acknowledgement handle. Delivery is
//! at-least-once; consumers must tolerate duplicates.

pub mod event;
pub mod memory;
pub mod queue;

pub use event::{DecodeError, NoteEvent, decode};
pub use memory::{InMemoryQueue, InMemorySubscription};
pub use queue::{Acknowledge, Delivery, PublishError, Publisher, ReceiveError, Subscription};

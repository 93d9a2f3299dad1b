//! Queue transport abstraction (mechanics only).
//!
//! Transport-agnostic: works with the in-memory channel queue for tests/dev
//! and the Redis Streams implementation in `notely-infra` for production.
//! Delivery is at-least-once; messages not acknowledged may be seen again.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by [`Subscription::receive`].
///
/// Anything here ends the consumer loop. Cancellation is signalled by the
/// caller racing the receive against a shutdown channel, not through the
/// subscription itself.
#[derive(Debug, Error)]
pub enum ReceiveError {
    /// The queue will deliver no further messages.
    #[error("subscription closed")]
    Closed,

    /// The backend failed in a way that is not recoverable by retrying the
    /// receive.
    #[error("queue backend failure: {0}")]
    Backend(String),
}

/// Errors surfaced by [`Publisher::publish`].
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("queue backend failure: {0}")]
    Backend(String),
}

/// Acknowledges a single delivery back to the queue backend.
///
/// Implementations log ack failures instead of returning them; with
/// at-least-once delivery an unacked message simply comes back later.
#[async_trait]
pub trait Acknowledge: Send + Sync {
    async fn ack(self: Box<Self>);
}

/// A message pulled from a subscription, carrying its own ack handle.
pub struct Delivery {
    message_id: String,
    body: Vec<u8>,
    acker: Box<dyn Acknowledge>,
}

impl Delivery {
    pub fn new(message_id: impl Into<String>, body: Vec<u8>, acker: Box<dyn Acknowledge>) -> Self {
        Self {
            message_id: message_id.into(),
            body,
            acker,
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Acknowledge the message, consuming the delivery.
    pub async fn ack(self) {
        self.acker.ack().await;
    }
}

impl core::fmt::Debug for Delivery {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Delivery")
            .field("message_id", &self.message_id)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// A pull subscription on a named queue/stream.
///
/// Single-consumer: `receive` takes `&mut self`. Competing consumers are a
/// backend concern (e.g. one consumer-group member per process).
#[async_trait]
pub trait Subscription: Send {
    /// Block until the next message is available or the subscription fails.
    async fn receive(&mut self) -> Result<Delivery, ReceiveError>;
}

/// Fire-and-forget publisher half. No response is ever published back.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, body: &[u8]) -> Result<(), PublishError>;
}

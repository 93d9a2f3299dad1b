//! In-memory queue for tests/dev.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::queue::{Acknowledge, Delivery, PublishError, Publisher, ReceiveError, Subscription};

struct QueuedMessage {
    id: String,
    body: Vec<u8>,
}

/// In-memory queue backed by an unbounded channel.
///
/// - No IO, no persistence
/// - Single subscription, created together with the queue
/// - Records acknowledged message ids so tests can assert on ack behavior
#[derive(Clone)]
pub struct InMemoryQueue {
    tx: mpsc::UnboundedSender<QueuedMessage>,
    next_id: Arc<AtomicU64>,
    acked: Arc<Mutex<Vec<String>>>,
}

/// Receiving half of an [`InMemoryQueue`].
pub struct InMemorySubscription {
    rx: mpsc::UnboundedReceiver<QueuedMessage>,
    acked: Arc<Mutex<Vec<String>>>,
}

struct MemoryAcker {
    id: String,
    acked: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Acknowledge for MemoryAcker {
    async fn ack(self: Box<Self>) {
        self.acked.lock().unwrap().push(self.id);
    }
}

impl InMemoryQueue {
    pub fn new() -> (Self, InMemorySubscription) {
        let (tx, rx) = mpsc::unbounded_channel();
        let acked = Arc::new(Mutex::new(Vec::new()));

        let queue = Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
            acked: acked.clone(),
        };
        let subscription = InMemorySubscription { rx, acked };

        (queue, subscription)
    }

    /// Ids of every acknowledged message, in ack order.
    pub fn acked(&self) -> Vec<String> {
        self.acked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for InMemoryQueue {
    async fn publish(&self, body: &[u8]) -> Result<(), PublishError> {
        let id = format!("m-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.tx
            .send(QueuedMessage {
                id,
                body: body.to_vec(),
            })
            .map_err(|_| PublishError::Backend("subscription dropped".to_string()))
    }
}

#[async_trait]
impl Subscription for InMemorySubscription {
    async fn receive(&mut self) -> Result<Delivery, ReceiveError> {
        match self.rx.recv().await {
            Some(message) => {
                let acker = MemoryAcker {
                    id: message.id.clone(),
                    acked: self.acked.clone(),
                };
                Ok(Delivery::new(message.id, message.body, Box::new(acker)))
            }
            None => Err(ReceiveError::Closed),
        }
    }
}

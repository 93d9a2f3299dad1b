//! Bounded-concurrency queue consumer.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Semaphore, watch};
use tracing::{error, info};

use notely_events::{DecodeError, Delivery, NoteEvent, ReceiveError, Subscription, decode};
use notely_notes::CreateHandler;

/// Fatal consumer failure. Per-message failures never show up here; only
/// the receive loop itself can kill the process.
#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("receive failed: {0}")]
    Receive(#[from] ReceiveError),
}

/// Pulls messages from a subscription and dispatches them with bounded
/// concurrency.
///
/// Admission is gated by a semaphore of `max_workers` permits. The receive
/// loop itself never waits on a permit, so more than `max_workers` messages
/// can be queued for admission, but at most `max_workers` handler bodies run
/// at once. Every message is acked once processing ends, success or failure;
/// failures are logged and never redelivered.
pub struct NoteConsumer {
    handler: Arc<CreateHandler>,
    max_workers: usize,
}

impl NoteConsumer {
    pub fn new(handler: Arc<CreateHandler>, max_workers: usize) -> Self {
        Self {
            handler,
            max_workers: max_workers.max(1),
        }
    }

    /// Run until the shutdown signal fires or the subscription fails.
    ///
    /// Running → Draining → Stopped: whichever way the loop exits, every
    /// permit is re-acquired before returning, so no task that started
    /// processing is abandoned mid-flight. A shutdown-signal exit is a clean
    /// `Ok(())`; a receive error is surfaced after the drain.
    pub async fn run<S>(
        &self,
        mut shutdown: watch::Receiver<bool>,
        mut subscription: S,
    ) -> Result<(), ConsumerError>
    where
        S: Subscription,
    {
        let workers = Arc::new(Semaphore::new(self.max_workers));

        let result = loop {
            tokio::select! {
                // A closed channel counts as shutdown too; either way the
                // in-flight receive future is dropped here.
                _ = shutdown.changed() => {
                    info!("shutdown signal received");
                    break Ok(());
                }
                received = subscription.receive() => match received {
                    Ok(delivery) => {
                        let handler = self.handler.clone();
                        let workers = workers.clone();
                        tokio::spawn(async move {
                            let _permit = workers
                                .acquire_owned()
                                .await
                                .expect("worker semaphore closed");
                            process(&handler, &delivery).await;
                            delivery.ack().await;
                        });
                    }
                    Err(err) => {
                        error!(error = %err, "receive failed, stopping consumer");
                        break Err(ConsumerError::Receive(err));
                    }
                }
            }
        };

        // Drain: owning all permits means every admitted task has finished.
        let _drained = workers
            .acquire_many(self.max_workers as u32)
            .await
            .expect("worker semaphore closed");

        result
    }
}

async fn process(handler: &CreateHandler, delivery: &Delivery) {
    info!(message_id = %delivery.message_id(), "message received");

    // Decode failures and unknown types are dropped after logging; the
    // caller acks regardless, so nothing is ever redelivered.
    match decode(delivery.body()) {
        Ok(NoteEvent::Create(new_note)) => {
            if let Err(err) = handler.create(new_note).await {
                error!(
                    message_id = %delivery.message_id(),
                    error = %err,
                    "failed to create note"
                );
            }
        }
        Err(DecodeError::UnknownType(kind)) => {
            error!(message_id = %delivery.message_id(), kind, "unknown event type");
        }
        Err(err) => {
            error!(
                message_id = %delivery.message_id(),
                error = %err,
                "failed to parse message body"
            );
        }
    }
}

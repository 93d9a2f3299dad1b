//! Redis Streams-backed queue (durable, at-least-once delivery).
//!
//! - **Publish**: `XADD` appends the raw message body to the stream.
//! - **Subscribe**: `XREADGROUP` on a consumer group; each message goes to
//!   one member of the group.
//! - **Ack**: `XACK` removes the message from the pending list. Messages are
//!   acked after processing regardless of outcome, so there is no
//!   redelivery-on-failure and no dead-letter queue here.
//!
//! Each subscription holds its own connection because `XREADGROUP .. BLOCK`
//! parks the connection it runs on; acks go over the shared non-blocking
//! connection.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::streams::StreamReadReply;
use thiserror::Error;
use tokio::time::timeout;
use tracing::error;

use notely_events::{Acknowledge, Delivery, PublishError, Publisher, ReceiveError, Subscription};

/// Stream entry field holding the message body.
const BODY_FIELD: &str = "body";

#[derive(Debug, Error)]
pub enum QueueSetupError {
    #[error("redis connection error: {0}")]
    Connection(String),

    #[error("redis command error: {0}")]
    Command(String),
}

/// Redis Streams queue handle: publisher plus subscription factory.
#[derive(Clone)]
pub struct RedisStreamsQueue {
    client: redis::Client,
    conn: MultiplexedConnection,
    stream_key: String,
}

impl RedisStreamsQueue {
    /// Connect and verify the backend with a `PING` bounded by
    /// `ping_timeout`.
    pub async fn connect(
        url: &str,
        stream_key: impl Into<String>,
        ping_timeout: Duration,
    ) -> Result<Self, QueueSetupError> {
        let client =
            redis::Client::open(url).map_err(|e| QueueSetupError::Connection(e.to_string()))?;

        let mut conn = timeout(ping_timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| QueueSetupError::Connection("connect timed out".to_string()))?
            .map_err(|e| QueueSetupError::Connection(e.to_string()))?;

        timeout(
            ping_timeout,
            redis::cmd("PING").query_async::<_, String>(&mut conn),
        )
        .await
        .map_err(|_| QueueSetupError::Connection("ping timed out".to_string()))?
        .map_err(|e| QueueSetupError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            conn,
            stream_key: stream_key.into(),
        })
    }

    /// Ensure a consumer group exists (idempotent).
    ///
    /// `XGROUP CREATE` with `MKSTREAM` creates the stream if it does not
    /// exist yet; an already-existing group reports `BUSYGROUP` and is fine.
    pub async fn ensure_consumer_group(&self, group: &str) -> Result<(), QueueSetupError> {
        let mut conn = self.conn.clone();
        let created = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.stream_key)
            .arg(group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async::<_, String>(&mut conn)
            .await;

        match created {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("BUSYGROUP") => Ok(()),
            Err(e) => Err(QueueSetupError::Command(e.to_string())),
        }
    }

    /// Open a consumer-group subscription.
    ///
    /// `wait_time` bounds how long a single `XREADGROUP` blocks; an empty
    /// read loops internally, it is not an error.
    pub async fn subscribe(
        &self,
        group: &str,
        consumer: &str,
        wait_time: Duration,
    ) -> Result<RedisStreamsSubscription, QueueSetupError> {
        self.ensure_consumer_group(group).await?;

        // Dedicated connection: XREADGROUP BLOCK parks it.
        let read_conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| QueueSetupError::Connection(e.to_string()))?;

        Ok(RedisStreamsSubscription {
            read_conn,
            ack_conn: self.conn.clone(),
            stream_key: self.stream_key.clone(),
            group: group.to_string(),
            consumer: consumer.to_string(),
            block_ms: wait_time.as_millis().max(1) as u64,
        })
    }
}

#[async_trait]
impl Publisher for RedisStreamsQueue {
    async fn publish(&self, body: &[u8]) -> Result<(), PublishError> {
        let mut conn = self.conn.clone();
        redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("*")
            .arg(BODY_FIELD)
            .arg(body)
            .query_async::<_, String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| PublishError::Backend(format!("XADD failed: {e}")))
    }
}

/// One member of a consumer group, pulling new entries.
pub struct RedisStreamsSubscription {
    read_conn: MultiplexedConnection,
    ack_conn: MultiplexedConnection,
    stream_key: String,
    group: String,
    consumer: String,
    block_ms: u64,
}

struct StreamAcker {
    conn: MultiplexedConnection,
    stream_key: String,
    group: String,
    message_id: String,
}

#[async_trait]
impl Acknowledge for StreamAcker {
    async fn ack(mut self: Box<Self>) {
        let acked = redis::cmd("XACK")
            .arg(&self.stream_key)
            .arg(&self.group)
            .arg(&self.message_id)
            .query_async::<_, u64>(&mut self.conn)
            .await;

        if let Err(e) = acked {
            error!(message_id = %self.message_id, error = %e, "failed to ack message");
        }
    }
}

#[async_trait]
impl Subscription for RedisStreamsSubscription {
    async fn receive(&mut self) -> Result<Delivery, ReceiveError> {
        loop {
            let reply = redis::cmd("XREADGROUP")
                .arg("GROUP")
                .arg(&self.group)
                .arg(&self.consumer)
                .arg("COUNT")
                .arg(1)
                .arg("BLOCK")
                .arg(self.block_ms)
                .arg("STREAMS")
                .arg(&self.stream_key)
                .arg(">")
                .query_async::<_, Option<StreamReadReply>>(&mut self.read_conn)
                .await
                .map_err(|e| ReceiveError::Backend(format!("XREADGROUP failed: {e}")))?;

            let Some(reply) = reply else {
                // Block timeout with no new entries.
                continue;
            };

            for stream in reply.keys {
                for entry in stream.ids {
                    let Some(body) = entry.get::<Vec<u8>>(BODY_FIELD) else {
                        // Entry without a body field is not ours to process;
                        // ack it away so it does not stay pending forever.
                        Box::new(StreamAcker {
                            conn: self.ack_conn.clone(),
                            stream_key: self.stream_key.clone(),
                            group: self.group.clone(),
                            message_id: entry.id.clone(),
                        })
                        .ack()
                        .await;
                        continue;
                    };

                    let acker = StreamAcker {
                        conn: self.ack_conn.clone(),
                        stream_key: self.stream_key.clone(),
                        group: self.group.clone(),
                        message_id: entry.id.clone(),
                    };
                    return Ok(Delivery::new(entry.id, body, Box::new(acker)));
                }
            }
        }
    }
}

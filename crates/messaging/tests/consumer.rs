//! Consumer behavior against the in-memory queue and store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use notely_core::{NewNote, Note};
use notely_events::{InMemoryQueue, Publisher, ReceiveError};
use notely_infra::InMemoryNoteStore;
use notely_messaging::{ConsumerError, NoteConsumer};
use notely_notes::{CreateHandler, NoteStore, StoreError};

const CREATE_EVENT: &[u8] = br#"{"type":"create","data":{"title":"other","text":"other text"}}"#;

fn consumer_for(store: Arc<dyn NoteStore>, max_workers: usize) -> NoteConsumer {
    NoteConsumer::new(Arc::new(CreateHandler::new(store)), max_workers)
}

async fn eventually(label: &str, mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {label}");
}

#[tokio::test]
async fn create_event_persists_exactly_one_row() {
    let (queue, subscription) = InMemoryQueue::new();
    let store = Arc::new(InMemoryNoteStore::new());
    let consumer = consumer_for(store.clone(), 4);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move { consumer.run(shutdown_rx, subscription).await });

    queue.publish(CREATE_EVENT).await.unwrap();

    eventually("row to be inserted", || store.all().len() == 1).await;
    eventually("message to be acked", || queue.acked().len() == 1).await;

    let rows = store.all();
    let row: &Note = &rows[0];
    assert!(row.id > 0);
    assert_eq!(row.title, "other");
    assert_eq!(row.text, "other text");
    assert_eq!(row.created_at, row.updated_at);

    // And the created row is visible through the read path.
    let found = store.find(row.id).await.unwrap().unwrap();
    assert_eq!(&found, row);

    shutdown_tx.send(true).unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn unknown_event_type_is_acked_without_store_mutation() {
    let (queue, subscription) = InMemoryQueue::new();
    let store = Arc::new(InMemoryNoteStore::new());
    let consumer = consumer_for(store.clone(), 2);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move { consumer.run(shutdown_rx, subscription).await });

    queue
        .publish(br#"{"type":"archive","data":{"id":1}}"#)
        .await
        .unwrap();

    eventually("message to be acked", || queue.acked().len() == 1).await;
    assert!(store.all().is_empty());

    shutdown_tx.send(true).unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn malformed_body_is_acked_and_dropped() {
    let (queue, subscription) = InMemoryQueue::new();
    let store = Arc::new(InMemoryNoteStore::new());
    let consumer = consumer_for(store.clone(), 2);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move { consumer.run(shutdown_rx, subscription).await });

    queue.publish(b"definitely not json").await.unwrap();

    eventually("message to be acked", || queue.acked().len() == 1).await;
    assert!(store.all().is_empty());

    shutdown_tx.send(true).unwrap();
    task.await.unwrap().unwrap();
}

#[derive(Default)]
struct BrokenStore;

#[async_trait]
impl NoteStore for BrokenStore {
    async fn find(&self, _id: i64) -> Result<Option<Note>, StoreError> {
        Err(StoreError::Database("connection refused".into()))
    }

    async fn insert(
        &self,
        _new_note: &NewNote,
        _timestamp: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        Err(StoreError::Database("connection refused".into()))
    }
}

#[tokio::test]
async fn handler_failure_still_acks_the_message() {
    let (queue, subscription) = InMemoryQueue::new();
    let consumer = consumer_for(Arc::new(BrokenStore), 2);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move { consumer.run(shutdown_rx, subscription).await });

    queue.publish(CREATE_EVENT).await.unwrap();

    // Ack-regardless-of-outcome: the failed create is logged and gone.
    eventually("message to be acked", || queue.acked().len() == 1).await;

    shutdown_tx.send(true).unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn single_worker_eventually_processes_all_messages() {
    let (queue, subscription) = InMemoryQueue::new();
    let store = Arc::new(InMemoryNoteStore::new());
    let consumer = consumer_for(store.clone(), 1);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move { consumer.run(shutdown_rx, subscription).await });

    queue.publish(CREATE_EVENT).await.unwrap();
    queue.publish(CREATE_EVENT).await.unwrap();

    eventually("both rows to be inserted", || store.all().len() == 2).await;
    eventually("both messages to be acked", || queue.acked().len() == 2).await;

    shutdown_tx.send(true).unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn closed_subscription_is_fatal_after_draining() {
    let (queue, subscription) = InMemoryQueue::new();
    let store = Arc::new(InMemoryNoteStore::new());
    let consumer = consumer_for(store.clone(), 2);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    queue.publish(CREATE_EVENT).await.unwrap();
    let acked = queue.acked();
    assert!(acked.is_empty());
    drop(queue);

    let result = consumer.run(shutdown_rx, subscription).await;
    assert!(matches!(
        result,
        Err(ConsumerError::Receive(ReceiveError::Closed))
    ));

    // The message received before the failure was drained, not abandoned.
    assert_eq!(store.all().len(), 1);
}

struct SlowStore {
    inner: InMemoryNoteStore,
    delay: Duration,
}

#[async_trait]
impl NoteStore for SlowStore {
    async fn find(&self, id: i64) -> Result<Option<Note>, StoreError> {
        self.inner.find(id).await
    }

    async fn insert(
        &self,
        new_note: &NewNote,
        timestamp: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(new_note, timestamp).await
    }
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_messages() {
    let (queue, subscription) = InMemoryQueue::new();
    let store = Arc::new(SlowStore {
        inner: InMemoryNoteStore::new(),
        delay: Duration::from_millis(200),
    });
    let consumer = consumer_for(store.clone(), 2);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move { consumer.run(shutdown_rx, subscription).await });

    queue.publish(CREATE_EVENT).await.unwrap();

    // Let the message get admitted, then signal shutdown mid-handler.
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(true).unwrap();

    task.await.unwrap().unwrap();

    // Drain completed the slow insert before run() returned.
    assert_eq!(store.inner.all().len(), 1);
    assert_eq!(queue.acked().len(), 1);
}

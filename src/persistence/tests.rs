use std::sync::Arc;
use std::time::Duration;

use super::{HistoryRecorder, MessageStore, StoredMessage};
use crate::broker::{Broker, Message};
use crate::config::Settings;
use crate::utils::{CancellationToken, StoreError};

fn msg(sender: &str, content: &str) -> Message {
    Message::broadcast(sender, content).with_timestamp(1_725_000_000_000)
}

#[tokio::test]
async fn test_store_and_load_message() {
    let store = MessageStore::new(10);

    let stored = store.add_message(msg("alice", "hello")).await.unwrap();
    assert_eq!(stored.sequence, 0);
    assert!(!stored.id.is_empty());

    let messages = store.get_messages(None).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message.content, "hello");
    assert_eq!(messages[0].message.sender, "alice");
}

#[tokio::test]
async fn test_max_messages_limit() {
    let store = MessageStore::new(3);

    for i in 0..3 {
        store.add_message(msg("alice", &format!("msg{i}"))).await.unwrap();
    }
    let err = store.add_message(msg("alice", "msg3")).await.unwrap_err();
    assert_eq!(err, StoreError::Full { capacity: 3 });

    let contents: Vec<_> = store
        .get_messages(None)
        .await
        .into_iter()
        .map(|m| m.message.content)
        .collect();
    assert_eq!(contents, vec!["msg0", "msg1", "msg2"]);
}

#[tokio::test]
async fn test_filter_by_sender_preserves_order() {
    let store = MessageStore::default();
    store.add_message(msg("alice", "a1")).await.unwrap();
    store.add_message(msg("bob", "b1")).await.unwrap();
    store.add_message(msg("alice", "a2")).await.unwrap();

    let from_alice = store.get_messages(Some("alice")).await;
    let sequences: Vec<_> = from_alice.iter().map(|m| m.sequence).collect();
    assert_eq!(sequences, vec![0, 2]);

    assert!(store.get_messages(Some("carol")).await.is_empty());
}

#[tokio::test]
async fn test_empty_store() {
    let store = MessageStore::default();
    assert!(store.is_empty().await);
    assert_eq!(store.capacity(), MessageStore::DEFAULT_CAPACITY);
    assert!(store.get_messages(None).await.is_empty());
}

#[test]
fn test_stored_message_json_is_flat() {
    let stored = StoredMessage {
        id: "id-1".into(),
        sequence: 4,
        message: msg("alice", "{\"key\":42}"),
    };

    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["sender"], "alice");
    assert_eq!(json["sequence"], 4);
    assert_eq!(json["broadcast"], true);
}

#[tokio::test]
async fn test_recorder_captures_broadcasts_and_direct_messages() {
    let broker = Broker::start(CancellationToken::new());
    let store = Arc::new(MessageStore::new(10));
    let recorder = HistoryRecorder::attach(&broker, "history", 8, store.clone()).await;
    assert!(broker.is_registered("history").await);

    broker.submit(msg("alice", "hi all")).await.unwrap();
    broker
        .submit(Message::direct("bob", "history", "for the record"))
        .await
        .unwrap();
    broker
        .submit(Message::direct("bob", "alice", "private"))
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(1), async {
        while store.len().await < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("recorder should store two messages");

    broker.shutdown().await;
    assert_eq!(recorder.finish().await, 2);

    let contents: Vec<_> = store
        .get_messages(None)
        .await
        .into_iter()
        .map(|m| m.message.content)
        .collect();
    assert_eq!(contents, vec!["hi all", "for the record"]);
}

#[tokio::test]
async fn test_recorder_from_settings_stops_at_capacity() {
    let mut settings = Settings::default().history;
    settings.capacity = 1;
    settings.participant_id = "archive".to_string();

    let broker = Broker::start(CancellationToken::new());
    let recorder = HistoryRecorder::from_settings(&broker, &settings).await;
    assert_eq!(recorder.participant_id(), "archive");
    let store = recorder.store().clone();

    broker.submit(msg("alice", "first")).await.unwrap();
    broker.submit(msg("alice", "second")).await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), async {
        while broker.stats().dispatched < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    broker.shutdown().await;
    assert_eq!(recorder.finish().await, 1);
    assert_eq!(store.len().await, 1);
}

use std::sync::Arc;

use tokio::sync::mpsc::error::TryRecvError;

use super::{Delivery, delivery_queue};
use crate::broker::Message;

fn sample() -> Arc<Message> {
    Arc::new(Message::direct("alice", "bob", "hello").with_timestamp(0))
}

#[test]
fn test_delivery_queue_accepts_up_to_capacity() {
    let (handle, mut inbox) = delivery_queue(2);
    let msg = sample();

    assert_eq!(handle.try_deliver(&msg), Delivery::Delivered);
    assert_eq!(handle.try_deliver(&msg), Delivery::Delivered);
    assert_eq!(handle.try_deliver(&msg), Delivery::Full);

    assert_eq!(inbox.drain().len(), 2);
    assert_eq!(handle.try_deliver(&msg), Delivery::Delivered);
}

#[test]
fn test_zero_capacity_is_raised_to_one() {
    let (handle, inbox) = delivery_queue(0);
    assert_eq!(inbox.capacity(), 1);
    assert_eq!(handle.try_deliver(&sample()), Delivery::Delivered);
    assert_eq!(handle.try_deliver(&sample()), Delivery::Full);
}

#[test]
fn test_dropped_inbox_reports_closed() {
    let (handle, inbox) = delivery_queue(4);
    drop(inbox);
    assert!(handle.is_closed());
    assert_eq!(handle.try_deliver(&sample()), Delivery::Closed);
}

#[test]
fn test_dropped_handle_is_end_of_stream_after_buffer() {
    let (handle, mut inbox) = delivery_queue(4);
    let msg = sample();
    handle.try_deliver(&msg);
    drop(handle);

    let received = inbox.try_recv().unwrap();
    assert!(Arc::ptr_eq(&received, &msg));
    assert_eq!(inbox.try_recv().unwrap_err(), TryRecvError::Disconnected);
}

#[test]
fn test_client_message_helpers() {
    let (_, inbox) = delivery_queue(1);
    let client = super::Client {
        id: "alice".to_string(),
        inbox,
    };

    let direct = client.direct_to("bob", "hi");
    assert_eq!(direct.sender, "alice");
    assert_eq!(direct.recipient, "bob");
    assert!(!direct.broadcast);

    let all = client.broadcast("hi all");
    assert_eq!(all.sender, "alice");
    assert!(all.broadcast);
}

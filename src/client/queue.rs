//! Per-participant delivery queues.
//!
//! A delivery queue is a bounded `tokio::sync::mpsc` channel split into a
//! [`DeliveryHandle`] (the sending end, handed to the broker at registration)
//! and an [`Inbox`] (the receiving end, owned by the participant's session).
//! The handle is deliberately not `Clone`: the registry holds the only
//! sender, so dropping the registry entry is what closes the queue.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

use crate::broker::Message;

/// Outcome of a single non-blocking delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The queue was at capacity; the message was dropped for this participant.
    Full,
    /// The participant dropped its inbox; the message was dropped.
    Closed,
}

#[derive(Debug)]
pub struct DeliveryHandle {
    tx: mpsc::Sender<Arc<Message>>,
}

impl DeliveryHandle {
    /// Attempt to enqueue without waiting. Never suspends.
    pub fn try_deliver(&self, message: &Arc<Message>) -> Delivery {
        match self.tx.try_send(Arc::clone(message)) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => Delivery::Full,
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// `true` once the participant has dropped its inbox.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving end of a delivery queue.
///
/// `recv` yields `None` once the broker has closed the queue (unregister,
/// replacement or shutdown) and every buffered message has been read.
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::Receiver<Arc<Message>>,
    capacity: usize,
}

impl Inbox {
    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Arc<Message>, TryRecvError> {
        self.rx.try_recv()
    }

    /// Read everything currently buffered without waiting.
    pub fn drain(&mut self) -> Vec<Arc<Message>> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Create a bounded delivery queue.
///
/// A capacity of zero is raised to one; a bounded channel needs room for at
/// least one message.
pub fn delivery_queue(capacity: usize) -> (DeliveryHandle, Inbox) {
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    (DeliveryHandle { tx }, Inbox { rx, capacity })
}

use std::sync::Arc;

use crate::broker::{Broker, Message, ParticipantId};
use crate::client::queue::{Inbox, delivery_queue};

/// A participant session attached to a broker.
///
/// Each client is uniquely identified by an `id` and owns the receiving end of
/// its delivery queue. The broker holds the sending end for as long as the
/// client stays registered.
#[derive(Debug)]
pub struct Client {
    /// Participant identifier the client registered under.
    pub id: ParticipantId,

    /// Messages routed to this participant.
    pub inbox: Inbox,
}

impl Client {
    /// Create a delivery queue of `capacity` messages and register it with
    /// `broker` under `id`.
    pub async fn join(broker: &Broker, id: impl Into<ParticipantId>, capacity: usize) -> Self {
        let id = id.into();
        let (handle, inbox) = delivery_queue(capacity);
        broker.register(id.clone(), handle).await;
        Self { id, inbox }
    }

    /// Unregister from `broker`. Messages already buffered stay readable.
    pub async fn leave(&self, broker: &Broker) {
        broker.unregister(&self.id).await;
    }

    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        self.inbox.recv().await
    }

    /// Convenience for a direct message from this participant.
    pub fn direct_to(&self, recipient: impl Into<ParticipantId>, content: impl Into<String>) -> Message {
        Message::direct(self.id.clone(), recipient, content)
    }

    /// Convenience for a broadcast from this participant.
    pub fn broadcast(&self, content: impl Into<String>) -> Message {
        Message::broadcast(self.id.clone(), content)
    }
}

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::broker::Message;
use crate::utils::StoreError;

/// A message as recorded in the history log.
///
/// `sequence` is the insertion position, starting at zero; `id` is a random
/// identifier for referencing the record from outside.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: String,
    pub sequence: u64,
    #[serde(flatten)]
    pub message: Message,
}

/// Bounded in-memory message log, ordered by insertion.
///
/// Once `capacity` records are held, further adds are rejected rather than
/// evicting older ones.
#[derive(Debug)]
pub struct MessageStore {
    messages: RwLock<Vec<StoredMessage>>,
    capacity: usize,
}

impl MessageStore {
    /// Capacity used when none is configured.
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(capacity: usize) -> Self {
        Self {
            messages: RwLock::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append `message`, returning the record that was stored.
    pub async fn add_message(&self, message: Message) -> Result<StoredMessage, StoreError> {
        let mut messages = self.messages.write().await;
        if messages.len() >= self.capacity {
            return Err(StoreError::Full {
                capacity: self.capacity,
            });
        }

        let stored = StoredMessage {
            id: uuid::Uuid::new_v4().to_string(),
            sequence: messages.len() as u64,
            message,
        };
        messages.push(stored.clone());
        Ok(stored)
    }

    /// All records in insertion order, or only those sent by `sender`.
    pub async fn get_messages(&self, sender: Option<&str>) -> Vec<StoredMessage> {
        let messages = self.messages.read().await;
        match sender {
            None => messages.clone(),
            Some(sender) => messages
                .iter()
                .filter(|stored| stored.message.sender == sender)
                .cloned()
                .collect(),
        }
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

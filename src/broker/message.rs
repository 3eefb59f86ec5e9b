use serde::{Deserialize, Serialize};

pub type ParticipantId = String;

/// One chat event routed by the broker.
///
/// A message is either addressed to a single `recipient`, or, when
/// `broadcast` is set, to every participant registered at the moment it is
/// routed (the sender included). The broker never inspects `content` and never
/// mutates a message once it has been submitted; recipients receive a shared
/// `Arc<Message>`.
///
/// # Fields
///
/// - `sender` - Identifier of the participant that produced the message.
/// - `recipient` - Target participant; ignored for broadcasts.
/// - `content` - Opaque payload.
/// - `broadcast` - Deliver to everyone instead of `recipient`.
/// - `timestamp` - Producer-supplied Unix time in milliseconds.
///
/// # Example
///
/// ```rust
/// use chatcore::broker::Message;
///
/// let msg = Message::direct("alice", "bob", "hi bob").with_timestamp(1_725_000_000_000);
/// assert!(!msg.broadcast);
/// assert_eq!(msg.recipient, "bob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: ParticipantId,
    #[serde(default)]
    pub recipient: ParticipantId,
    pub content: String,
    #[serde(default)]
    pub broadcast: bool,
    pub timestamp: i64,
}

impl Message {
    /// A message for a single recipient, stamped with the current time.
    pub fn direct(
        sender: impl Into<ParticipantId>,
        recipient: impl Into<ParticipantId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
            broadcast: false,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// A message for every registered participant, stamped with the current time.
    pub fn broadcast(sender: impl Into<ParticipantId>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: ParticipantId::new(),
            content: content.into(),
            broadcast: true,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

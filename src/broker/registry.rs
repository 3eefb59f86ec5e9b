use std::collections::HashMap;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::debug;

use crate::broker::message::ParticipantId;
use crate::client::DeliveryHandle;

/// Result of a [`SubscriberRegistry::register`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    /// An entry already existed for the id; its old queue has been closed.
    Replaced,
    /// The registry has been drained for shutdown; the handle was dropped.
    Closed,
}

#[derive(Debug)]
struct Members {
    subscribers: HashMap<ParticipantId, DeliveryHandle>,
    open: bool,
}

/// Maps each participant id to the sending end of its delivery queue.
///
/// Routing takes the read lock and may run alongside other readers.
/// Membership changes and the shutdown drain take the write lock. Closing a
/// participant's queue (dropping its handle) always happens while the write
/// lock is held, so no routing pass can observe a half-removed entry.
#[derive(Debug)]
pub struct SubscriberRegistry {
    members: RwLock<Members>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(Members {
                subscribers: HashMap::new(),
                open: true,
            }),
        }
    }

    /// Insert or replace the entry for `id`. Last write wins.
    pub async fn register(&self, id: ParticipantId, handle: DeliveryHandle) -> Registration {
        let mut members = self.members.write().await;

        if !members.open {
            drop(handle);
            debug!(participant = %id, "Registration after shutdown; queue closed");
            return Registration::Closed;
        }

        match members.subscribers.insert(id.clone(), handle) {
            Some(previous) => {
                drop(previous);
                debug!(participant = %id, "Participant re-registered; previous queue closed");
                Registration::Replaced
            }
            None => {
                debug!(participant = %id, "Participant registered");
                Registration::Inserted
            }
        }
    }

    /// Remove the entry for `id` and close its queue. Returns `false` if absent.
    pub async fn unregister(&self, id: &str) -> bool {
        let mut members = self.members.write().await;

        match members.subscribers.remove(id) {
            Some(handle) => {
                drop(handle);
                debug!(participant = %id, "Participant unregistered");
                true
            }
            None => false,
        }
    }

    /// Close every queue, empty the registry and refuse later registrations.
    ///
    /// Returns the number of queues closed.
    pub async fn close_all(&self) -> usize {
        let mut members = self.members.write().await;
        members.open = false;
        let drained: Vec<_> = members.subscribers.drain().collect();
        let closed = drained.len();
        drop(drained);
        closed
    }

    /// Shared access to the current membership, for routing.
    pub async fn read(&self) -> RwLockReadGuard<'_, HashMap<ParticipantId, DeliveryHandle>> {
        RwLockReadGuard::map(self.members.read().await, |members| &members.subscribers)
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.subscribers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.members.read().await.subscribers.contains_key(id)
    }

    /// Snapshot of the registered ids, sorted.
    pub async fn participants(&self) -> Vec<ParticipantId> {
        let members = self.members.read().await;
        let mut ids: Vec<_> = members.subscribers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

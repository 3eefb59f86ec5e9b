//! Feeds the broker's fan-out into a [`MessageStore`].
//!
//! The recorder is an ordinary participant: it registers a delivery queue
//! under its own id and therefore sees every broadcast plus any direct message
//! addressed to that id. It stops when the broker closes its queue.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::broker::{Broker, ParticipantId};
use crate::client::{Inbox, delivery_queue};
use crate::config::HistorySettings;
use crate::persistence::MessageStore;

#[derive(Debug)]
pub struct HistoryRecorder {
    participant_id: ParticipantId,
    store: Arc<MessageStore>,
    task: JoinHandle<usize>,
}

impl HistoryRecorder {
    /// Register with `broker` and start copying deliveries into `store`.
    pub async fn attach(
        broker: &Broker,
        participant_id: impl Into<ParticipantId>,
        inbox_capacity: usize,
        store: Arc<MessageStore>,
    ) -> Self {
        let participant_id = participant_id.into();
        let (handle, inbox) = delivery_queue(inbox_capacity);
        broker.register(participant_id.clone(), handle).await;

        let task = tokio::spawn(record(inbox, store.clone()));
        debug!(participant = %participant_id, "History recorder attached");

        Self {
            participant_id,
            store,
            task,
        }
    }

    pub async fn from_settings(broker: &Broker, settings: &HistorySettings) -> Self {
        let store = Arc::new(MessageStore::new(settings.capacity));
        Self::attach(
            broker,
            settings.participant_id.clone(),
            settings.inbox_capacity,
            store,
        )
        .await
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    /// Wait for the recorder to finish (its queue must be closed, by
    /// unregistering it or shutting the broker down). Returns the number of
    /// messages stored.
    pub async fn finish(self) -> usize {
        match self.task.await {
            Ok(recorded) => recorded,
            Err(e) => {
                warn!(error = %e, "History recorder task failed");
                0
            }
        }
    }
}

async fn record(mut inbox: Inbox, store: Arc<MessageStore>) -> usize {
    let mut recorded = 0;
    let mut rejected = 0u64;

    while let Some(message) = inbox.recv().await {
        match store.add_message(message.as_ref().clone()).await {
            Ok(_) => recorded += 1,
            Err(e) => {
                // Log once when the store first fills up, then stay quiet.
                if rejected == 0 {
                    warn!(error = %e, "Message history full; dropping further messages");
                }
                rejected += 1;
            }
        }
    }

    debug!(recorded, rejected, "History recorder stopped");
    recorded
}

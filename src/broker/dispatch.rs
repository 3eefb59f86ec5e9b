//! The dispatch loop
//!
//! A single task drains the input queue and routes each message to the
//! delivery queues of its recipients. Every delivery-queue write is a
//! `try_send`: a stalled consumer loses messages, it never stalls the loop.
//!
//! ```text
//!   submit ─┐
//!   submit ─┼─► input queue (bounded mpsc) ─► DispatchLoop::run
//!   submit ─┘                                     │ read lock
//!                                                 ▼
//!                                 SubscriberRegistry ──try_send──► Inbox
//!                                                    ──try_send──► Inbox
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{info, trace};

use crate::broker::message::Message;
use crate::broker::registry::SubscriberRegistry;
use crate::broker::stats::DispatchStats;
use crate::client::{Delivery, DeliveryHandle};
use crate::utils::CancellationToken;

/// Lifecycle of a broker. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerState {
    Running,
    ShuttingDown,
    Stopped,
}

pub struct DispatchLoop {
    input: mpsc::Receiver<Message>,
    registry: Arc<SubscriberRegistry>,
    token: CancellationToken,
    state: watch::Sender<BrokerState>,
    stats: Arc<DispatchStats>,
}

impl DispatchLoop {
    pub(crate) fn new(
        input: mpsc::Receiver<Message>,
        registry: Arc<SubscriberRegistry>,
        token: CancellationToken,
        state: watch::Sender<BrokerState>,
        stats: Arc<DispatchStats>,
    ) -> Self {
        Self {
            input,
            registry,
            token,
            state,
            stats,
        }
    }

    /// Route messages until the token fires, then close every delivery queue.
    ///
    /// The loop also stops if every input sender is gone, which only happens
    /// once the owning broker has been dropped.
    pub async fn run(mut self) {
        info!("Dispatch loop started");

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                next = self.input.recv() => match next {
                    Some(message) => self.route(Arc::new(message)).await,
                    None => break,
                },
            }
        }

        self.shutdown().await;
    }

    async fn route(&self, message: Arc<Message>) {
        let subscribers = self.registry.read().await;

        if message.broadcast {
            for (id, handle) in subscribers.iter() {
                self.deliver(id, handle, &message);
            }
        } else {
            match subscribers.get(&message.recipient) {
                Some(handle) => self.deliver(&message.recipient, handle, &message),
                None => {
                    self.stats.record_unroutable();
                    trace!(
                        sender = %message.sender,
                        recipient = %message.recipient,
                        "Recipient not registered; message discarded"
                    );
                }
            }
        }

        drop(subscribers);
        self.stats.record_dispatched();
    }

    fn deliver(&self, id: &str, handle: &DeliveryHandle, message: &Arc<Message>) {
        let outcome = handle.try_deliver(message);
        self.stats.record_delivery(outcome);

        match outcome {
            Delivery::Delivered => {}
            Delivery::Full => {
                trace!(participant = %id, sender = %message.sender, "Delivery queue full; message dropped");
            }
            Delivery::Closed => {
                trace!(participant = %id, sender = %message.sender, "Inbox gone; message dropped");
            }
        }
    }

    async fn shutdown(mut self) {
        self.state.send_replace(BrokerState::ShuttingDown);
        info!("Broker shutting down");

        let closed = self.registry.close_all().await;

        // Producers still waiting on a full queue see a closed channel.
        self.input.close();
        let discarded = std::iter::from_fn(|| self.input.try_recv().ok()).count();

        self.state.send_replace(BrokerState::Stopped);
        info!(
            closed_queues = closed,
            discarded_messages = discarded,
            "Broker stopped"
        );
    }
}

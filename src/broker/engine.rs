//! Broker engine
//!
//! This module contains the in-process broker responsible for:
//! - accepting messages from any number of concurrent producers
//! - maintaining the participant registry
//! - owning the single dispatch task that routes messages to delivery queues
//! - coordinating shutdown through a shared cancellation token
//!
//! Concurrency and usage notes:
//! - `Broker` is `Send + Sync`; share it behind an `Arc` and call its methods
//!   from as many tasks as needed.
//! - `submit` waits only for room in the input queue. It never waits on a
//!   recipient: routing happens later, on the dispatch task, and is best-effort.
//! - Firing the token is the only shutdown trigger. `shutdown` is a
//!   convenience that fires it and waits for the dispatch task to finish.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::broker::dispatch::{BrokerState, DispatchLoop};
use crate::broker::message::{Message, ParticipantId};
use crate::broker::registry::{Registration, SubscriberRegistry};
use crate::broker::stats::{DispatchStats, StatsSnapshot};
use crate::client::DeliveryHandle;
use crate::config::BrokerSettings;
use crate::utils::{BrokerError, CancellationToken};

#[derive(Debug)]
pub struct Broker {
    input: mpsc::Sender<Message>,
    registry: Arc<SubscriberRegistry>,
    token: CancellationToken,
    state: watch::Receiver<BrokerState>,
    stats: Arc<DispatchStats>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Broker {
    /// Input queue capacity used when none is configured.
    pub const DEFAULT_INPUT_CAPACITY: usize = 100;

    /// Start a broker with the default input capacity.
    ///
    /// Must be called from within a tokio runtime; the dispatch task is
    /// spawned immediately.
    pub fn start(token: CancellationToken) -> Self {
        Self::with_capacity(Self::DEFAULT_INPUT_CAPACITY, token)
    }

    pub fn with_settings(settings: &BrokerSettings, token: CancellationToken) -> Self {
        Self::with_capacity(settings.input_capacity, token)
    }

    /// Start a broker whose input queue holds at most `input_capacity`
    /// messages (raised to 1 if zero).
    pub fn with_capacity(input_capacity: usize, token: CancellationToken) -> Self {
        let (input_tx, input_rx) = mpsc::channel(input_capacity.max(1));
        let (state_tx, state_rx) = watch::channel(BrokerState::Running);
        let registry = Arc::new(SubscriberRegistry::new());
        let stats = Arc::new(DispatchStats::new());

        let dispatch = DispatchLoop::new(
            input_rx,
            registry.clone(),
            token.clone(),
            state_tx,
            stats.clone(),
        );
        let worker = tokio::spawn(dispatch.run());

        Self {
            input: input_tx,
            registry,
            token,
            state: state_rx,
            stats,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Hand a message to the broker for routing.
    ///
    /// Fails with [`BrokerError::Canceled`] if the token has already fired, or
    /// if it fires while waiting for room in the input queue. Success means
    /// the message was accepted, not that anyone received it.
    pub async fn submit(&self, message: Message) -> Result<(), BrokerError> {
        if self.token.is_cancelled() {
            return Err(BrokerError::Canceled);
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(BrokerError::Canceled),
            sent = self.input.send(message) => sent.map_err(|_| BrokerError::Canceled),
        }
    }

    /// Register `handle` as the delivery queue for `id`, replacing (and
    /// closing) any previous queue for the same id.
    ///
    /// Once the broker has drained its registry for shutdown the handle is
    /// dropped instead, so its inbox reports end-of-stream right away.
    pub async fn register(&self, id: impl Into<ParticipantId>, handle: DeliveryHandle) {
        let id = id.into();
        if self.registry.register(id.clone(), handle).await == Registration::Closed {
            debug!(participant = %id, state = ?self.state(), "Broker no longer running; registration ignored");
        }
    }

    /// Remove `id` and close its delivery queue. No-op if absent.
    pub async fn unregister(&self, id: &str) {
        self.registry.unregister(id).await;
    }

    pub fn state(&self) -> BrokerState {
        *self.state.borrow()
    }

    /// Wait until the broker reaches [`BrokerState::Stopped`]. Does not fire the token.
    pub async fn stopped(&self) {
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s == BrokerState::Stopped).await;
    }

    /// Fire the cancellation token and wait for the dispatch task to close
    /// every delivery queue. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.token.cancel();

        let worker = self.worker.lock().await.take();
        match worker {
            Some(handle) => {
                if let Err(e) = handle.await {
                    error!(error = %e, "Dispatch task terminated abnormally");
                }
            }
            None => self.stopped().await,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn participant_count(&self) -> usize {
        self.registry.len().await
    }

    pub async fn is_registered(&self, id: &str) -> bool {
        self.registry.contains(id).await
    }

    /// Registered participant ids, sorted.
    pub async fn participants(&self) -> Vec<ParticipantId> {
        self.registry.participants().await
    }
}

//! Dispatch counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::client::Delivery;

/// Counters updated by the dispatch loop. Observational only.
#[derive(Debug, Default)]
pub struct DispatchStats {
    dispatched: AtomicU64,
    delivered: AtomicU64,
    dropped_full: AtomicU64,
    dropped_closed: AtomicU64,
    unroutable: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Messages taken off the input queue and routed
    pub dispatched: u64,
    /// Successful delivery-queue writes
    pub delivered: u64,
    /// Deliveries dropped because the recipient's queue was full
    pub dropped_full: u64,
    /// Deliveries dropped because the recipient's inbox was gone
    pub dropped_closed: u64,
    /// Direct messages whose recipient was not registered
    pub unroutable: u64,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_delivery(&self, outcome: Delivery) {
        let counter = match outcome {
            Delivery::Delivered => &self.delivered,
            Delivery::Full => &self.dropped_full,
            Delivery::Closed => &self.dropped_closed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unroutable(&self) {
        self.unroutable.fetch_add(1, Ordering::Relaxed);
    }

    // Bumped after a message's deliveries are recorded, so a reader that sees
    // `dispatched == n` also sees the delivery outcomes of the first n messages.
    pub(crate) fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Release);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let dispatched = self.dispatched.load(Ordering::Acquire);
        StatsSnapshot {
            dispatched,
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped_full: self.dropped_full.load(Ordering::Relaxed),
            dropped_closed: self.dropped_closed.load(Ordering::Relaxed),
            unroutable: self.unroutable.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Deliveries that did not reach a queue, for any reason.
    pub fn dropped(&self) -> u64 {
        self.dropped_full + self.dropped_closed
    }
}

//! The `error` module defines the error types used within `chatcore`.
//!
//! Routing failures are deliberately absent: a full or closed delivery queue
//! and an unknown recipient are silent drops, so the only error a producer can
//! observe is [`BrokerError::Canceled`].

/// Errors surfaced synchronously by the broker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// The broker's cancellation token fired before the message was accepted.
    #[error("broker is shutting down; message was not accepted")]
    Canceled,
}

/// Errors returned by the in-memory message history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("message store is full (capacity: {capacity})")]
    Full { capacity: usize },
}

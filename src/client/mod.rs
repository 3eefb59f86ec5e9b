//! The `client` module defines the participant side of the broker.
//!
//! It provides the bounded delivery queue a participant reads from, and the
//! `Client` struct, which encapsulates a single registered participant
//! session: its identifier and the inbox its messages arrive on.

pub mod pubsub_client;
pub mod queue;

pub use pubsub_client::Client;
pub use queue::{Delivery, DeliveryHandle, Inbox, delivery_queue};

#[cfg(test)]
mod tests;

//! The `persistence` module keeps a history of routed messages.
//!
//! History lives outside the broker: a bounded in-memory log fed by a
//! recorder that subscribes to the broker like any other participant. The
//! broker itself keeps no copy of the messages it routes.

pub mod memory_store;
pub mod recorder;

pub use memory_store::{MessageStore, StoredMessage};
pub use recorder::HistoryRecorder;

#[cfg(test)]
mod tests;

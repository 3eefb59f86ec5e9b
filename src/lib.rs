//! # chatcore
//!
//! `chatcore` is an in-process publish/subscribe broker for chat messages.
//! Any number of producers submit messages; a single dispatch task routes
//! each one to a single recipient or to every registered participant, using
//! non-blocking writes into bounded per-participant queues. Delivery is
//! best-effort: a slow participant loses messages rather than slowing anyone
//! else down.
//!
//! ## Core Modules
//!
//! - `broker`: the message type, participant registry, dispatch loop and the `Broker` itself.
//! - `client`: delivery queues and the participant session that reads from one.
//! - `config`: loading settings from files and environment variables.
//! - `persistence`: a bounded in-memory message history fed from the broker's fan-out.
//! - `utils`: error types, the cancellation token and logging setup.
//!
//! ## Example
//!
//! ```rust
//! use chatcore::broker::{Broker, Message};
//! use chatcore::client::Client;
//! use chatcore::utils::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let broker = Broker::start(CancellationToken::new());
//! let mut alice = Client::join(&broker, "alice", 16).await;
//!
//! broker.submit(Message::direct("bob", "alice", "hi")).await.unwrap();
//! assert_eq!(alice.recv().await.unwrap().content, "hi");
//!
//! broker.shutdown().await;
//! assert!(alice.recv().await.is_none());
//! # }
//! ```

pub mod broker;
pub mod client;
pub mod config;
pub mod persistence;
pub mod utils;

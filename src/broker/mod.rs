pub mod dispatch;
pub mod engine;
pub mod message;
pub mod registry;
pub mod stats;

pub use dispatch::BrokerState;
pub use engine::Broker;
pub use message::{Message, ParticipantId};
pub use stats::StatsSnapshot;

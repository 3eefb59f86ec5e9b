//! The `utils` module provides shared building blocks used across `chatcore`:
//! error types, the cancellation token, and logging setup.

pub mod cancel;
pub mod error;
pub mod logging;

pub use cancel::CancellationToken;
pub use error::{BrokerError, StoreError};

//! Application layer - Use cases and orchestration
//!
//! Contains the port definitions the weather pipeline depends on, the batch
//! update orchestrator and the read-side query facade.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

//! Telemetry infrastructure
//!
//! Structured logging via `tracing-subscriber`.

mod logging;

pub use logging::{TelemetryError, build_filter, init_logging};

//! Event Sink Implementations
//!
//! Concrete implementations of RepublishEventSink:
//! - JsonEventSink: NDJSON output for automation
//! - TracingEventSink: Structured log lines through `tracing`

mod json;
mod log;

pub use json::JsonEventSink;
pub use log::TracingEventSink;

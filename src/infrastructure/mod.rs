//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `database/` - Asset database stores (JSON file, memory)
//! - `scene/` - Scene host over JSON manifests
//! - `pipeline/` - Manifest publish pipeline
//! - `process/` - OS process spawner
//! - `events/` - Republish event sinks (NDJSON, tracing)

mod atomic;
pub mod database;
pub mod events;
pub mod pipeline;
pub mod process;
pub mod scene;

// Re-export for convenience
pub use database::{JsonDocumentStore, MemoryDatabase};
pub use events::{JsonEventSink, TracingEventSink};
pub use pipeline::ManifestPipeline;
pub use process::CommandSpawner;
pub use scene::{ManifestSceneHost, SceneManifest};

//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod asset_database;
pub mod process_spawner;
pub mod publish_pipeline;
pub mod republish_events;
pub mod scene_host;

pub use asset_database::{AssetDatabase, DatabaseError, DatabaseResult};
pub use process_spawner::{ProcessOutput, ProcessSpawner, SpawnError};
pub use publish_pipeline::{IntegrateOptions, PipelineError, PipelineResult, PublishPipeline};
pub use republish_events::{NoopEventSink, RepublishEvent, RepublishEventSink};
pub use scene_host::{LoadedReference, SceneError, SceneHost, SceneInstance, SceneResult};

//! PublishPipeline implementations

mod manifest;

pub use manifest::{ManifestPipeline, PUBLISH_LOCK_KEY};

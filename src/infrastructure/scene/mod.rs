//! SceneHost implementations

mod manifest;

pub use manifest::{ManifestSceneHost, SceneManifest};

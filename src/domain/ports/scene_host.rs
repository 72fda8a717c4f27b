//! SceneHost port - the editable-scene session of the content application
//!
//! A host keeps at most one scene open. Callers go through
//! `application::republish::SceneSession`, which turns that constraint into
//! an exclusive borrow.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::VersionId;

/// Result type for scene host operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Scene host errors
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("cannot read scene {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("cannot write scene {path}: {reason}")]
    Unwritable { path: PathBuf, reason: String },

    #[error("no scene is open")]
    NoSceneOpen,

    #[error("reference '{0}' is not loaded in the open scene")]
    UnknownReference(String),

    #[error("instance '{0}' does not exist in the open scene")]
    UnknownInstance(String),
}

/// A loaded reference (container) of a published subset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedReference {
    pub id: String,
    /// Subset name the reference was loaded from
    pub subset: String,
    pub version: VersionId,
}

/// A publishable instance authored in the scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneInstance {
    /// May be missing on instances authored by old tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub subset: String,
    pub family: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Abstract content-application scene session
pub trait SceneHost {
    /// Open `path`, discarding unsaved changes of the current scene when
    /// `force_discard` is set.
    fn open(&mut self, path: &Path, force_discard: bool) -> SceneResult<()>;

    /// Save the open scene under a new name; the new name becomes current.
    fn save_as(&mut self, path: &Path) -> SceneResult<()>;

    fn loaded_references(&self) -> SceneResult<Vec<LoadedReference>>;

    fn update_reference(
        &mut self,
        reference: &LoadedReference,
        version: &VersionId,
    ) -> SceneResult<()>;

    fn instances(&self) -> SceneResult<Vec<SceneInstance>>;

    fn set_instance_active(&mut self, instance: &SceneInstance, active: bool) -> SceneResult<()>;
}

impl<T: SceneHost + ?Sized> SceneHost for Box<T> {
    fn open(&mut self, path: &Path, force_discard: bool) -> SceneResult<()> {
        (**self).open(path, force_discard)
    }

    fn save_as(&mut self, path: &Path) -> SceneResult<()> {
        (**self).save_as(path)
    }

    fn loaded_references(&self) -> SceneResult<Vec<LoadedReference>> {
        (**self).loaded_references()
    }

    fn update_reference(
        &mut self,
        reference: &LoadedReference,
        version: &VersionId,
    ) -> SceneResult<()> {
        (**self).update_reference(reference, version)
    }

    fn instances(&self) -> SceneResult<Vec<SceneInstance>> {
        (**self).instances()
    }

    fn set_instance_active(&mut self, instance: &SceneInstance, active: bool) -> SceneResult<()> {
        (**self).set_instance_active(instance, active)
    }
}

impl<T: SceneHost + ?Sized> SceneHost for &mut T {
    fn open(&mut self, path: &Path, force_discard: bool) -> SceneResult<()> {
        (**self).open(path, force_discard)
    }

    fn save_as(&mut self, path: &Path) -> SceneResult<()> {
        (**self).save_as(path)
    }

    fn loaded_references(&self) -> SceneResult<Vec<LoadedReference>> {
        (**self).loaded_references()
    }

    fn update_reference(
        &mut self,
        reference: &LoadedReference,
        version: &VersionId,
    ) -> SceneResult<()> {
        (**self).update_reference(reference, version)
    }

    fn instances(&self) -> SceneResult<Vec<SceneInstance>> {
        (**self).instances()
    }

    fn set_instance_active(&mut self, instance: &SceneInstance, active: bool) -> SceneResult<()> {
        (**self).set_instance_active(instance, active)
    }
}

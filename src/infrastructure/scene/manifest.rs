//! Manifest Scene Host
//!
//! A headless stand-in for a content application: every scene is a JSON
//! manifest listing its loaded references and publish instances.
//!
//! ```json
//! {
//!   "references": [{"id": "modelRN", "subset": "modelDefault", "version": "<version id>"}],
//!   "instances": [{"subset": "rigDefault", "family": "rig", "active": true}]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ports::{LoadedReference, SceneError, SceneHost, SceneInstance, SceneResult};
use crate::domain::value_objects::VersionId;
use crate::infrastructure::atomic::write_atomic;

/// On-disk scene content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub references: Vec<LoadedReference>,
    #[serde(default)]
    pub instances: Vec<SceneInstance>,
}

impl SceneManifest {
    pub fn read(path: &Path) -> SceneResult<Self> {
        let unreadable = |reason: String| SceneError::Unreadable {
            path: path.to_path_buf(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))
    }

    pub fn write(&self, path: &Path) -> SceneResult<()> {
        let unwritable = |reason: String| SceneError::Unwritable {
            path: path.to_path_buf(),
            reason,
        };
        let content = serde_json::to_vec_pretty(self).map_err(|e| unwritable(e.to_string()))?;
        write_atomic(path, &content).map_err(|e| unwritable(e.to_string()))
    }
}

struct OpenManifest {
    path: PathBuf,
    manifest: SceneManifest,
    dirty: bool,
}

/// Scene host over JSON manifests
#[derive(Default)]
pub struct ManifestSceneHost {
    open: Option<OpenManifest>,
}

impl ManifestSceneHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the open scene
    pub fn current_path(&self) -> Option<&Path> {
        self.open.as_ref().map(|o| o.path.as_path())
    }

    fn scene(&self) -> SceneResult<&OpenManifest> {
        self.open.as_ref().ok_or(SceneError::NoSceneOpen)
    }

    fn scene_mut(&mut self) -> SceneResult<&mut OpenManifest> {
        self.open.as_mut().ok_or(SceneError::NoSceneOpen)
    }
}

impl SceneHost for ManifestSceneHost {
    fn open(&mut self, path: &Path, force_discard: bool) -> SceneResult<()> {
        if let Some(current) = &self.open {
            if current.dirty && !force_discard {
                return Err(SceneError::Unwritable {
                    path: current.path.clone(),
                    reason: "scene has unsaved changes".to_string(),
                });
            }
        }

        let manifest = SceneManifest::read(path)?;
        self.open = Some(OpenManifest {
            path: path.to_path_buf(),
            manifest,
            dirty: false,
        });
        Ok(())
    }

    fn save_as(&mut self, path: &Path) -> SceneResult<()> {
        let scene = self.scene_mut()?;
        scene.manifest.write(path)?;
        scene.path = path.to_path_buf();
        scene.dirty = false;
        tracing::debug!(scene = %path.display(), "saved scene manifest");
        Ok(())
    }

    fn loaded_references(&self) -> SceneResult<Vec<LoadedReference>> {
        Ok(self.scene()?.manifest.references.clone())
    }

    fn update_reference(
        &mut self,
        reference: &LoadedReference,
        version: &VersionId,
    ) -> SceneResult<()> {
        let scene = self.scene_mut()?;
        let loaded = scene
            .manifest
            .references
            .iter_mut()
            .find(|r| r.id == reference.id)
            .ok_or_else(|| SceneError::UnknownReference(reference.id.clone()))?;
        if &loaded.version != version {
            loaded.version = version.clone();
            scene.dirty = true;
        }
        Ok(())
    }

    fn instances(&self) -> SceneResult<Vec<SceneInstance>> {
        Ok(self.scene()?.manifest.instances.clone())
    }

    fn set_instance_active(&mut self, instance: &SceneInstance, active: bool) -> SceneResult<()> {
        let scene = self.scene_mut()?;
        let target = scene
            .manifest
            .instances
            .iter_mut()
            .find(|i| match (&instance.id, &i.id) {
                (Some(wanted), Some(id)) => wanted == id,
                _ => i.subset == instance.subset && i.family == instance.family,
            })
            .ok_or_else(|| SceneError::UnknownInstance(instance.subset.clone()))?;
        if target.active != active {
            target.active = active;
            scene.dirty = true;
        }
        Ok(())
    }
}

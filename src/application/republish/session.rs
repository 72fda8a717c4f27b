//! Scene session
//!
//! The content application can hold exactly one open scene. `SceneSession`
//! owns the host, and [`SceneSession::open`] hands out an [`OpenScene`] that
//! mutably borrows the session: while it lives nobody else can open another
//! scene, and dropping it releases the session whether the job succeeded or
//! not.

use std::path::{Path, PathBuf};

use crate::domain::ports::{LoadedReference, SceneHost, SceneInstance, SceneResult};
use crate::domain::value_objects::VersionId;

/// Exclusive owner of the scene host
pub struct SceneSession<H: SceneHost> {
    host: H,
    current: Option<PathBuf>,
}

impl<H: SceneHost> SceneSession<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            current: None,
        }
    }

    /// Open `path`, discarding whatever the previous job left unsaved.
    pub fn open(&mut self, path: &Path) -> SceneResult<OpenScene<'_, H>> {
        self.host.open(path, true)?;
        self.current = Some(path.to_path_buf());
        Ok(OpenScene { session: self })
    }

    /// Scene held by a live [`OpenScene`], if any
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

/// Scoped handle on the open scene
pub struct OpenScene<'s, H: SceneHost> {
    session: &'s mut SceneSession<H>,
}

impl<H: SceneHost> OpenScene<'_, H> {
    /// Path the scene was opened from, or last saved to
    pub fn path(&self) -> &Path {
        self.session.current.as_deref().unwrap_or_else(|| Path::new(""))
    }

    pub fn loaded_references(&self) -> SceneResult<Vec<LoadedReference>> {
        self.session.host.loaded_references()
    }

    pub fn update_reference(
        &mut self,
        reference: &LoadedReference,
        version: &VersionId,
    ) -> SceneResult<()> {
        self.session.host.update_reference(reference, version)
    }

    pub fn instances(&self) -> SceneResult<Vec<SceneInstance>> {
        self.session.host.instances()
    }

    pub fn set_instance_active(&mut self, instance: &SceneInstance, active: bool) -> SceneResult<()> {
        self.session.host.set_instance_active(instance, active)
    }

    pub fn save_as(&mut self, path: &Path) -> SceneResult<()> {
        self.session.host.save_as(path)?;
        self.session.current = Some(path.to_path_buf());
        Ok(())
    }
}

impl<H: SceneHost> Drop for OpenScene<'_, H> {
    fn drop(&mut self) {
        if let Some(path) = self.session.current.take() {
            tracing::debug!(scene = %path.display(), "released scene session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SceneError;

    #[derive(Default)]
    struct CountingHost {
        opened: Vec<(PathBuf, bool)>,
    }

    impl SceneHost for CountingHost {
        fn open(&mut self, path: &Path, force_discard: bool) -> SceneResult<()> {
            if path.ends_with("missing.ma") {
                return Err(SceneError::Unreadable {
                    path: path.to_path_buf(),
                    reason: "no such file".to_string(),
                });
            }
            self.opened.push((path.to_path_buf(), force_discard));
            Ok(())
        }

        fn save_as(&mut self, _path: &Path) -> SceneResult<()> {
            Ok(())
        }

        fn loaded_references(&self) -> SceneResult<Vec<LoadedReference>> {
            Ok(vec![])
        }

        fn update_reference(&mut self, _r: &LoadedReference, _v: &VersionId) -> SceneResult<()> {
            Ok(())
        }

        fn instances(&self) -> SceneResult<Vec<SceneInstance>> {
            Ok(vec![])
        }

        fn set_instance_active(&mut self, _i: &SceneInstance, _a: bool) -> SceneResult<()> {
            Ok(())
        }
    }

    #[test]
    fn open_forces_discard_and_release_clears_current() {
        let mut session = SceneSession::new(CountingHost::default());
        {
            let scene = session.open(Path::new("/p/a.ma")).unwrap();
            assert_eq!(scene.path(), Path::new("/p/a.ma"));
        }
        assert!(session.current().is_none());
        assert_eq!(session.host().opened, vec![(PathBuf::from("/p/a.ma"), true)]);
    }

    #[test]
    fn save_as_moves_current_path() {
        let mut session = SceneSession::new(CountingHost::default());
        let mut scene = session.open(Path::new("/p/a.ma")).unwrap();
        scene.save_as(Path::new("/p/_auto_update/a.auto_model_update.001.ma")).unwrap();
        assert_eq!(
            scene.path(),
            Path::new("/p/_auto_update/a.auto_model_update.001.ma")
        );
    }

    #[test]
    fn failed_open_leaves_session_free() {
        let mut session = SceneSession::new(CountingHost::default());
        assert!(session.open(Path::new("/p/missing.ma")).is_err());
        assert!(session.current().is_none());
        assert!(session.open(Path::new("/p/b.ma")).is_ok());
    }
}

//! Manifest Publish Pipeline
//!
//! A generic four-stage publish over scene manifests:
//!
//! - collect: one instance per active manifest instance, depending on every
//!   loaded reference
//! - validate: subset, family and id must be present
//! - extract: one artifact per instance in the staging directory, optionally
//!   produced by an external command
//! - integrate: a new version document per instance, artifacts moved under
//!   the publish root

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::domain::entities::{
    Document, DocumentType, Patch, PublishContext, PublishInstance, PublishStage, Query,
    SortOrder, SourceContext, StageResult, DEPENDENCIES_KEY, SOURCE_KEY,
};
use crate::domain::ports::{
    AssetDatabase, IntegrateOptions, PipelineError, PipelineResult, ProcessSpawner,
    PublishPipeline,
};
use crate::domain::value_objects::{SourceLocator, VersionId};
use crate::infrastructure::atomic::write_atomic;
use crate::infrastructure::scene::SceneManifest;

/// Subset data flag that blocks concurrent publishes; held for the length
/// of one instance's integration unless the caller bypasses it
pub const PUBLISH_LOCK_KEY: &str = "publishLock";

pub struct ManifestPipeline<D: AssetDatabase, S: ProcessSpawner> {
    db: D,
    spawner: S,
    project_root: PathBuf,
    staging_dir: PathBuf,
    publish_root: PathBuf,
    extract_command: Vec<String>,
}

impl<D: AssetDatabase, S: ProcessSpawner> ManifestPipeline<D, S> {
    pub fn new(db: D, spawner: S, project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            db,
            spawner,
            staging_dir: project_root.join(".rigcascade/staging"),
            publish_root: project_root.join("publish"),
            project_root,
            extract_command: Vec::new(),
        }
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn with_publish_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.publish_root = dir.into();
        self
    }

    /// Program and arguments run once per instance during extraction.
    ///
    /// `{scene}`, `{subset}`, `{family}` and `{output}` are substituted in
    /// every argument. The command must write the artifact to `{output}`.
    pub fn with_extract_command(mut self, command: Vec<String>) -> Self {
        self.extract_command = command;
        self
    }

    fn artifact_path(&self, source: &SourceContext, instance: &PublishInstance) -> PathBuf {
        self.staging_dir
            .join(&source.asset)
            .join(&instance.subset)
            .join(format!("{}.json", instance.subset))
    }

    fn extract_instance(
        &self,
        source: &SourceContext,
        instance: &PublishInstance,
        output: &Path,
    ) -> Result<(), String> {
        let Some((program, args)) = self.extract_command.split_first() else {
            let artifact = json!({
                "subset": instance.subset,
                "family": instance.family,
                "scene": source.scene.to_string_lossy(),
                "dependencies": instance.dependencies,
            });
            let content = serde_json::to_vec_pretty(&artifact).map_err(|e| e.to_string())?;
            return write_atomic(output, &content).map_err(|e| e.to_string());
        };

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let args: Vec<String> = args
            .iter()
            .map(|arg| {
                arg.replace("{scene}", &source.scene.to_string_lossy())
                    .replace("{subset}", &instance.subset)
                    .replace("{family}", &instance.family)
                    .replace("{output}", &output.to_string_lossy())
            })
            .collect();
        let result = self
            .spawner
            .run(Path::new(program), &args)
            .map_err(|e| e.to_string())?;
        if !result.success() {
            return Err(result
                .diagnostic()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} exited with {:?}", program, result.code)));
        }
        if !output.exists() {
            return Err(format!("{} did not produce {}", program, output.display()));
        }
        Ok(())
    }

    fn find_subset(&self, asset: &Document, name: &str) -> PipelineResult<Option<Document>> {
        Ok(self.db.find_one(
            &Query::of_type(DocumentType::Subset)
                .with_parent(&asset.id)
                .with_name(name),
        )?)
    }

    fn next_version_index(&self, subset: &Document) -> PipelineResult<u32> {
        let latest = self.db.find_one(
            &Query::of_type(DocumentType::Version)
                .with_parent(&subset.id)
                .sorted(SortOrder::NameDescending),
        )?;
        Ok(latest
            .and_then(|doc| doc.name.as_index())
            .map_or(1, |index| index + 1))
    }

    fn integrate_instance(
        &self,
        context: &PublishContext,
        asset: &Document,
        instance: &PublishInstance,
        options: &IntegrateOptions,
    ) -> PipelineResult<()> {
        let subset = match self.find_subset(asset, &instance.subset)? {
            Some(subset) => subset,
            None => {
                let doc = Document::new("", DocumentType::Subset, instance.subset.as_str())
                    .with_parent(asset.id.clone())
                    .with_data("family", json!(instance.family));
                let id = self.db.insert(doc.clone())?;
                Document { id, ..doc }
            }
        };

        let locked = subset
            .data_path(PUBLISH_LOCK_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if options.skip_subset_lock {
            return self.publish_version(context, &subset, instance);
        }
        if locked {
            return Err(PipelineError::SubsetLocked {
                subset: instance.subset.clone(),
            });
        }

        self.set_publish_lock(&subset, true)?;
        let published = self.publish_version(context, &subset, instance);
        let released = self.set_publish_lock(&subset, false);
        if let Err(err) = &released {
            tracing::warn!(subset = %instance.subset, error = %err, "could not release publish lock");
        }
        published?;
        released
    }

    fn set_publish_lock(&self, subset: &Document, locked: bool) -> PipelineResult<()> {
        let patch = Patch::new().set(format!("data.{}", PUBLISH_LOCK_KEY), json!(locked));
        self.db.update(&subset.id, &patch)?;
        Ok(())
    }

    fn publish_version(
        &self,
        context: &PublishContext,
        subset: &Document,
        instance: &PublishInstance,
    ) -> PipelineResult<()> {
        let index = self.next_version_index(subset)?;
        let version_dir = self
            .publish_root
            .join(&context.source.asset)
            .join(&instance.subset)
            .join(format!("v{:03}", index));
        fs::create_dir_all(&version_dir)?;

        let mut files = Vec::with_capacity(instance.artifacts.len());
        for artifact in &instance.artifacts {
            let file_name = artifact.file_name().ok_or_else(|| PipelineError::Unreadable {
                path: artifact.clone(),
                reason: "artifact has no file name".to_string(),
            })?;
            let dest = version_dir.join(file_name);
            move_file(artifact, &dest)?;
            files.push(Value::String(
                SourceLocator::templated(&dest, &self.project_root),
            ));
        }

        let version = Document::new("", DocumentType::Version, index)
            .with_parent(subset.id.clone())
            .with_data(DEPENDENCIES_KEY, dependency_map(&instance.dependencies))
            .with_data(
                SOURCE_KEY,
                json!(SourceLocator::templated(&context.source.scene, &self.project_root)),
            )
            .with_data("comment", json!(context.comment.clone().unwrap_or_default()))
            .with_data("time", json!(chrono::Utc::now().to_rfc3339()))
            .with_data("families", json!([instance.family]))
            .with_data("task", json!(context.source.task))
            .with_data("files", Value::Array(files));
        let id = self.db.insert(version)?;

        tracing::info!(
            subset = %instance.subset,
            version = index,
            id = %id,
            "integrated version"
        );
        Ok(())
    }
}

fn dependency_map(dependencies: &BTreeSet<VersionId>) -> Value {
    let map: Map<String, Value> = dependencies
        .iter()
        .map(|id| (id.as_str().to_string(), json!({})))
        .collect();
    Value::Object(map)
}

fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

impl<D: AssetDatabase, S: ProcessSpawner> PublishPipeline for ManifestPipeline<D, S> {
    fn collect(&self, source: &SourceContext) -> PipelineResult<PublishContext> {
        let manifest =
            SceneManifest::read(&source.scene).map_err(|e| PipelineError::Unreadable {
                path: source.scene.clone(),
                reason: e.to_string(),
            })?;

        let dependencies: BTreeSet<VersionId> = manifest
            .references
            .iter()
            .map(|r| r.version.clone())
            .collect();

        let mut context = PublishContext::new(source.clone());
        for scene_instance in manifest.instances.iter().filter(|i| i.active) {
            let mut instance =
                PublishInstance::new(scene_instance.subset.as_str(), scene_instance.family.as_str());
            instance.id = scene_instance.id.clone();
            instance.dependencies = dependencies.clone();
            context.instances.push(instance);
        }
        context.record(StageResult::passed(PublishStage::Collect, None));

        tracing::debug!(
            scene = %source.scene.display(),
            instances = context.instances.len(),
            "collected"
        );
        Ok(context)
    }

    fn validate(&self, mut context: PublishContext) -> PipelineResult<PublishContext> {
        let mut results = Vec::new();
        for instance in context.active_instances() {
            let label = Some(instance.subset.as_str());
            let problem = if instance.subset.is_empty() {
                Some("instance has no subset name")
            } else if instance.family.is_empty() {
                Some("instance has no family")
            } else if instance.id.as_deref().map_or(true, str::is_empty) {
                Some("instance has no id")
            } else {
                None
            };
            results.push(match problem {
                Some(message) => StageResult::failed(PublishStage::Validate, label, message),
                None => StageResult::passed(PublishStage::Validate, label),
            });
        }
        for result in results {
            context.record(result);
        }
        Ok(context)
    }

    fn extract(&self, mut context: PublishContext) -> PipelineResult<PublishContext> {
        let source = context.source.clone();
        let mut results = Vec::new();
        for instance in context.instances.iter_mut().filter(|i| i.active) {
            let output = self.artifact_path(&source, instance);
            let label = Some(instance.subset.as_str());
            match self.extract_instance(&source, instance, &output) {
                Ok(()) => {
                    results.push(StageResult::passed(PublishStage::Extract, label));
                    instance.artifacts.push(output);
                }
                Err(message) => {
                    results.push(StageResult::failed(PublishStage::Extract, label, message));
                }
            }
        }
        for result in results {
            context.record(result);
        }
        Ok(context)
    }

    fn integrate(
        &self,
        context: &PublishContext,
        options: &IntegrateOptions,
    ) -> PipelineResult<()> {
        let asset = self
            .db
            .find_one(&Query::of_type(DocumentType::Asset).with_name(context.source.asset.as_str()))?
            .ok_or_else(|| PipelineError::Stage {
                stage: PublishStage::Integrate,
                message: format!("asset '{}' not found", context.source.asset),
            })?;

        for instance in context.active_instances() {
            self.integrate_instance(context, &asset, instance, options)?;
        }
        Ok(())
    }
}

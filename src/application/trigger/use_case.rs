//! Auto Update Use Case
//!
//! Orchestrates the trigger flow:
//! 1. Load the asset and check its auto-update gate
//! 2. Load the published subset and version
//! 3. Resolve stale dependents
//! 4. Launch the worker for them and report the outcome
//!
//! Everything except the launch is read-only; the only write is the
//! failure annotation done by the launcher.

use crate::application::launcher::{LaunchOutcome, WorkerLauncher};
use crate::domain::entities::{Asset, JobDescriptor, Subset, Version};
use crate::domain::ports::{AssetDatabase, ProcessSpawner};
use crate::domain::services::{Staleness, StalenessResolver, VersionGraph};
use crate::error::{CascadeError, CascadeResult};

use super::options::{TriggerOptions, AUTO_UPDATE_OPTION};
use super::result::TriggerOutcome;

pub struct AutoUpdateUseCase<D, S>
where
    D: AssetDatabase,
    S: ProcessSpawner,
{
    db: D,
    launcher: WorkerLauncher<S>,
}

impl<D, S> AutoUpdateUseCase<D, S>
where
    D: AssetDatabase,
    S: ProcessSpawner,
{
    pub fn new(db: D, launcher: WorkerLauncher<S>) -> Self {
        Self { db, launcher }
    }

    /// Resolve stale dependents without launching anything.
    pub fn resolve(&self, options: &TriggerOptions) -> CascadeResult<Staleness> {
        let graph = VersionGraph::new(&self.db);
        let asset = self.load_asset(&graph, options)?;
        let (subset, version) = self.load_published(&graph, &asset, options)?;
        let resolver = StalenessResolver::new(options.dependent_prefix.as_str());
        Ok(resolver.resolve(&graph, &asset, &subset, &version)?)
    }

    pub fn execute(&self, options: &TriggerOptions) -> CascadeResult<TriggerOutcome> {
        let graph = VersionGraph::new(&self.db);
        let asset = self.load_asset(&graph, options)?;

        if options.require_task_option && !auto_update_enabled(&asset, &options.task) {
            tracing::debug!(asset = %asset.name, task = %options.task, "auto update not enabled");
            return Ok(TriggerOutcome::Disabled);
        }

        let (subset, version) = self.load_published(&graph, &asset, options)?;
        let resolver = StalenessResolver::new(options.dependent_prefix.as_str());
        let dependents = match resolver.resolve(&graph, &asset, &subset, &version)? {
            Staleness::FirstVersion => return Ok(TriggerOutcome::FirstVersion),
            Staleness::NoPreviousVersions => return Ok(TriggerOutcome::NoPreviousVersions),
            Staleness::Resolved(dependents) if dependents.is_empty() => {
                tracing::info!(asset = %asset.name, "no stale dependents");
                return Ok(TriggerOutcome::NoStaleDependents);
            }
            Staleness::Resolved(dependents) => dependents,
        };

        let descriptor = JobDescriptor::new(&asset.name, &subset.name, dependents.clone());
        match self.launcher.launch(&self.db, &version.id, &descriptor) {
            LaunchOutcome::Completed => Ok(TriggerOutcome::Updated { dependents }),
            LaunchOutcome::Failed {
                message,
                diagnostic,
                ..
            } => Ok(TriggerOutcome::FlaggedForFollowUp {
                dependents,
                message,
                diagnostic,
            }),
        }
    }

    fn load_asset(
        &self,
        graph: &VersionGraph<'_, D>,
        options: &TriggerOptions,
    ) -> CascadeResult<Asset> {
        graph
            .asset(&options.asset)?
            .ok_or_else(|| CascadeError::AssetNotFound(options.asset.clone()))
    }

    /// The published subset and version named by `options`
    fn load_published(
        &self,
        graph: &VersionGraph<'_, D>,
        asset: &Asset,
        options: &TriggerOptions,
    ) -> CascadeResult<(Subset, Version)> {
        let subset = graph
            .subset(asset, &options.subset)?
            .ok_or_else(|| CascadeError::SubsetNotFound {
                asset: asset.name.clone(),
                subset: options.subset.clone(),
            })?;
        let version = match &options.version {
            Some(id) => graph
                .version(id)?
                .ok_or_else(|| CascadeError::VersionNotFound(id.clone()))?,
            None => graph
                .latest_version(&subset)?
                .ok_or_else(|| CascadeError::NoVersions(subset.name.clone()))?,
        };
        if version.subset != subset.id {
            return Err(CascadeError::VersionSubsetMismatch {
                version: version.id,
                subset: subset.name,
            });
        }
        Ok((subset, version))
    }
}

fn auto_update_enabled(asset: &Asset, task: &str) -> bool {
    asset
        .task_option(task, AUTO_UPDATE_OPTION)
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

//! Worker Use Case
//!
//! Orchestrates one worker run:
//! 1. Resolve the configured repair capabilities
//! 2. Look up the base subset and its latest version
//! 3. Plan jobs from the dependent versions
//! 4. Extract every job, then integrate the whole batch
//!
//! Nothing is integrated unless every job that reached the pipeline
//! extracted successfully.

use std::sync::Arc;

use crate::application::republish::{ExtractedBatch, RepublishTarget, StagedRepublish};
use crate::domain::entities::JobDescriptor;
use crate::domain::policies::RepairTable;
use crate::domain::ports::{
    AssetDatabase, NoopEventSink, PublishPipeline, RepublishEvent, RepublishEventSink, SceneHost,
};
use crate::domain::services::{JobPlanner, VersionGraph};
use crate::error::{CascadeError, CascadeResult};

use super::options::WorkerOptions;
use super::result::WorkerReport;

pub struct WorkerUseCase<D, H, P>
where
    D: AssetDatabase,
    H: SceneHost,
    P: PublishPipeline,
{
    db: D,
    host: H,
    pipeline: P,
    repairs: RepairTable,
}

impl<D, H, P> WorkerUseCase<D, H, P>
where
    D: AssetDatabase,
    H: SceneHost,
    P: PublishPipeline,
{
    pub fn new(db: D, host: H, pipeline: P) -> Self {
        Self {
            db,
            host,
            pipeline,
            repairs: RepairTable::builtin(),
        }
    }

    /// Replace the repair capability table
    pub fn with_repair_table(mut self, repairs: RepairTable) -> Self {
        self.repairs = repairs;
        self
    }

    pub fn execute(self, descriptor: &JobDescriptor, options: &WorkerOptions) -> CascadeResult<WorkerReport> {
        self.execute_with_events(descriptor, options, Arc::new(NoopEventSink))
    }

    /// Run the worker, reporting progress to `events`
    pub fn execute_with_events(
        self,
        descriptor: &JobDescriptor,
        options: &WorkerOptions,
        events: Arc<dyn RepublishEventSink>,
    ) -> CascadeResult<WorkerReport> {
        let Self {
            db,
            host,
            pipeline,
            repairs,
        } = self;
        let selected = repairs.select(&options.repairs)?;

        let graph = VersionGraph::new(&db);
        let asset = graph
            .asset(&descriptor.asset_name)?
            .ok_or_else(|| CascadeError::AssetNotFound(descriptor.asset_name.clone()))?;
        let base_subset = graph
            .subset(&asset, &descriptor.base_subset)?
            .ok_or_else(|| CascadeError::SubsetNotFound {
                asset: asset.name.clone(),
                subset: descriptor.base_subset.clone(),
            })?;
        let base_version = graph
            .latest_version(&base_subset)?
            .ok_or_else(|| CascadeError::NoVersions(base_subset.name.clone()))?;

        let jobs = JobPlanner::new(&options.project_root).plan(&graph, &descriptor.dependents)?;
        events.on_event(RepublishEvent::Planned {
            job_count: jobs.len(),
            dependent_count: descriptor.dependents.len(),
        });
        tracing::info!(
            asset = %asset.name,
            base = %base_subset.name,
            version = base_version.index,
            jobs = jobs.len(),
            "starting republish"
        );

        let target = RepublishTarget {
            asset: asset.name.clone(),
            base_subset: base_subset.name.clone(),
            base_version: base_version.id.clone(),
        };
        let mut staged = StagedRepublish::new(host, pipeline, options.republish.clone())
            .with_repairs(selected)
            .with_events(events.clone());

        let extracted = staged.extract_all(&target, &jobs);
        let failed_jobs = extracted.failed_jobs().count();
        let batch = match ExtractedBatch::try_from(extracted) {
            Ok(batch) => batch,
            Err(err) => {
                events.on_event(RepublishEvent::Completed {
                    integrated_count: 0,
                    failed_count: failed_jobs.max(1),
                });
                return Err(err);
            }
        };

        // A failure here has already been reported as a job event; what was
        // integrated before it stays integrated.
        let integration = staged.integrate_all(batch)?;
        events.on_event(RepublishEvent::Completed {
            integrated_count: integration.integrated.len(),
            failed_count: integration.skipped.len(),
        });

        Ok(WorkerReport {
            job_count: jobs.len(),
            integrated: integration.integrated,
            skipped: integration.skipped,
        })
    }
}

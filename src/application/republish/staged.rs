//! Staged republish
//!
//! Runs every job of a batch through open, retarget, select, persist,
//! collect, repair, validate and extract, strictly one after the other.
//! Integration is a separate call that only accepts an [`ExtractedBatch`],
//! so nothing reaches the database unless every job extracted cleanly.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::{Job, JobSet, PublishContext, PublishStage, SourceContext};
use crate::domain::policies::InstanceRepair;
use crate::domain::ports::{
    IntegrateOptions, NoopEventSink, PipelineError, PublishPipeline, RepublishEvent,
    RepublishEventSink, SceneHost,
};
use crate::domain::value_objects::{next_free_revision_path, RepublishStage};
use crate::error::{CascadeError, CascadeResult};

use super::options::{RepublishSettings, RepublishTarget};
use super::report::{
    aborts_batch, ExtractReport, ExtractedBatch, IntegrationReport, JobOutcome, JobReport,
};
use super::session::SceneSession;

type StageFailure = (RepublishStage, CascadeError);

/// Sequential two-phase republish over one scene session
pub struct StagedRepublish<'r, H: SceneHost, P: PublishPipeline> {
    session: SceneSession<H>,
    pipeline: P,
    repairs: Vec<&'r dyn InstanceRepair>,
    settings: RepublishSettings,
    events: Arc<dyn RepublishEventSink>,
    revision_taken: fn(&Path) -> bool,
}

impl<'r, H: SceneHost, P: PublishPipeline> StagedRepublish<'r, H, P> {
    pub fn new(host: H, pipeline: P, settings: RepublishSettings) -> Self {
        Self {
            session: SceneSession::new(host),
            pipeline,
            repairs: Vec::new(),
            settings,
            events: Arc::new(NoopEventSink),
            revision_taken: Path::exists,
        }
    }

    pub fn with_repairs(mut self, repairs: Vec<&'r dyn InstanceRepair>) -> Self {
        self.repairs = repairs;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn RepublishEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Override how an existing revision file is detected.
    pub fn with_revision_check(mut self, taken: fn(&Path) -> bool) -> Self {
        self.revision_taken = taken;
        self
    }

    pub fn session(&self) -> &SceneSession<H> {
        &self.session
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Run every job up to and including extraction.
    ///
    /// Stops at the first job whose failure aborts the batch; later jobs are
    /// reported as not run.
    pub fn extract_all(&mut self, target: &RepublishTarget, jobs: &JobSet) -> ExtractReport {
        let mut report = ExtractReport::default();

        for (index, job) in jobs.jobs().iter().enumerate() {
            if report.aborted_at.is_some() {
                report.jobs.push(JobReport::new(index, job));
                continue;
            }

            let mut job_report = JobReport::new(index, job);
            let stage = Cell::new(RepublishStage::OpeningSource);
            let revision = &mut job_report.revision;
            let result = guard_host(&stage, || self.run_job(index, job, target, revision, &stage));
            match result {
                Ok(context) => {
                    self.events.on_event(RepublishEvent::Extracted {
                        index,
                        instance_count: context.active_instances().count(),
                    });
                    job_report.outcome = JobOutcome::Extracted(context);
                }
                Err((stage, error)) => {
                    tracing::warn!(job = index + 1, %stage, %error, "republish job failed");
                    self.events.on_event(RepublishEvent::JobFailed {
                        index,
                        stage,
                        error: error.to_string(),
                    });
                    if aborts_batch(stage, &error) {
                        report.aborted_at = Some(index);
                    }
                    job_report.outcome = JobOutcome::Failed { stage, error };
                }
            }
            report.jobs.push(job_report);
        }

        report
    }

    /// Integrate every context of the batch, in job order.
    pub fn integrate_all(&self, batch: ExtractedBatch) -> CascadeResult<IntegrationReport> {
        let options = IntegrateOptions::sequential_batch();
        self.events.on_event(RepublishEvent::IntegrationStarted {
            context_count: batch.len(),
        });

        let mut report = IntegrationReport {
            integrated: Vec::with_capacity(batch.len()),
            skipped: batch.skipped().to_vec(),
        };
        let stage = Cell::new(RepublishStage::IntegratingAll);
        for (index, context) in batch.contexts() {
            let integrated = guard_host(&stage, || {
                self.pipeline
                    .integrate(context, &options)
                    .map_err(|e| (RepublishStage::IntegratingAll, e.into()))
            });
            if let Err((_, err)) = integrated {
                self.events.on_event(RepublishEvent::JobFailed {
                    index,
                    stage: RepublishStage::IntegratingAll,
                    error: err.to_string(),
                });
                tracing::error!(
                    job = index + 1,
                    integrated = report.integrated.len(),
                    error = %err,
                    "integration stopped part way through the batch"
                );
                return Err(err);
            }
            self.events.on_event(RepublishEvent::Integrated { index });
            report.integrated.push(index);
        }

        Ok(report)
    }

    fn run_job(
        &mut self,
        index: usize,
        job: &Job,
        target: &RepublishTarget,
        revision: &mut Option<PathBuf>,
        current: &Cell<RepublishStage>,
    ) -> Result<PublishContext, StageFailure> {
        let Self {
            session,
            pipeline,
            repairs,
            settings,
            events,
            revision_taken,
        } = self;
        let source = job.source.to_path_buf();
        let enter = |stage: RepublishStage| {
            current.set(stage);
            tracing::debug!(job = index + 1, source = %source.display(), %stage, "entering stage");
            events.on_event(RepublishEvent::StageEntered {
                index,
                source: source.clone(),
                stage,
            });
        };

        enter(RepublishStage::OpeningSource);
        let mut scene = session
            .open(&source)
            .map_err(|e| (RepublishStage::OpeningSource, e.into()))?;

        enter(RepublishStage::RetargetingReferences);
        let references = scene
            .loaded_references()
            .map_err(|e| (RepublishStage::RetargetingReferences, e.into()))?;
        let matching: Vec<_> = references
            .into_iter()
            .filter(|r| r.subset == target.base_subset)
            .collect();
        if matching.is_empty() {
            return Err((
                RepublishStage::RetargetingReferences,
                CascadeError::NoMatchingReference {
                    subset: target.base_subset.clone(),
                    scene: source.clone(),
                },
            ));
        }
        for reference in &matching {
            scene
                .update_reference(reference, &target.base_version)
                .map_err(|e| (RepublishStage::RetargetingReferences, e.into()))?;
        }

        enter(RepublishStage::SelectingInstances);
        let instances = scene
            .instances()
            .map_err(|e| (RepublishStage::SelectingInstances, e.into()))?;
        for instance in &instances {
            scene
                .set_instance_active(instance, job.publishes(&instance.subset))
                .map_err(|e| (RepublishStage::SelectingInstances, e.into()))?;
        }

        enter(RepublishStage::Persisting);
        let taken = *revision_taken;
        let path = next_free_revision_path(&source, &settings.revision_dir, taken);
        scene
            .save_as(&path)
            .map_err(|e| (RepublishStage::Persisting, e.into()))?;
        *revision = Some(path.clone());
        events.on_event(RepublishEvent::Persisted {
            index,
            revision: path.clone(),
        });

        enter(RepublishStage::Collecting);
        let collect_from = SourceContext {
            asset: target.asset.clone(),
            task: settings.task.clone(),
            scene: path,
        };
        let mut context = pipeline
            .collect(&collect_from)
            .map_err(|e| (RepublishStage::Collecting, e.into()))?;
        apply_repairs(repairs, &mut context);
        context.comment = Some(settings.comment.clone());

        enter(RepublishStage::Validating);
        let context = pipeline
            .validate(context)
            .map_err(|e| (RepublishStage::Validating, e.into()))?;
        ensure_succeeded(&context, PublishStage::Validate)
            .map_err(|e| (RepublishStage::Validating, e))?;

        enter(RepublishStage::Extracting);
        let context = pipeline
            .extract(context)
            .map_err(|e| (RepublishStage::Extracting, e.into()))?;
        ensure_succeeded(&context, PublishStage::Extract)
            .map_err(|e| (RepublishStage::Extracting, e))?;

        drop(scene);
        Ok(context)
    }
}

/// A failing repair leaves the instance as it was; validation has the final say.
fn apply_repairs(repairs: &[&dyn InstanceRepair], context: &mut PublishContext) {
    let source = &context.source;
    for instance in context.instances.iter_mut() {
        for repair in repairs {
            match repair.repair(source, instance) {
                Ok(true) => {
                    tracing::info!(repair = repair.id(), subset = %instance.subset, "repaired instance");
                }
                Ok(false) => {}
                Err(message) => {
                    tracing::warn!(
                        repair = repair.id(),
                        subset = %instance.subset,
                        %message,
                        "repair failed"
                    );
                }
            }
        }
    }
}

fn ensure_succeeded(context: &PublishContext, stage: PublishStage) -> CascadeResult<()> {
    if context.all_succeeded() {
        return Ok(());
    }
    let message = context
        .failures()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(PipelineError::Stage { stage, message }.into())
}

/// Run host and pipeline calls, turning a panic into a failure of the stage
/// `current` held when it happened.
fn guard_host<T>(
    current: &Cell<RepublishStage>,
    call: impl FnOnce() -> Result<T, StageFailure>,
) -> Result<T, StageFailure> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        let stage = current.get();
        Err((
            stage,
            CascadeError::Host {
                stage,
                diagnostic: panic_message(payload.as_ref()),
            },
        ))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "host aborted without a message".to_string()
    }
}

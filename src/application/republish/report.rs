//! Extraction and integration reports
//!
//! [`ExtractedBatch`] is the only input [`super::StagedRepublish::integrate_all`]
//! accepts, and it can only be built from an [`ExtractReport`] whose
//! extractions all succeeded.

use std::path::PathBuf;

use crate::domain::entities::{Job, PublishContext};
use crate::domain::value_objects::{RepublishStage, SourceLocator};
use crate::error::{CascadeError, CascadeResult};

/// How far one job got
#[derive(Debug)]
pub enum JobOutcome {
    /// Extraction finished; the context waits for integration
    Extracted(PublishContext),
    Failed {
        stage: RepublishStage,
        error: CascadeError,
    },
    /// Not attempted because an earlier job aborted the batch
    NotRun,
}

/// Result of processing one job up to extraction
#[derive(Debug)]
pub struct JobReport {
    pub index: usize,
    pub source: SourceLocator,
    pub subsets: Vec<String>,
    /// Revision the retargeted scene was saved as
    pub revision: Option<PathBuf>,
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn new(index: usize, job: &Job) -> Self {
        Self {
            index,
            source: job.source.clone(),
            subsets: job.subsets.clone(),
            revision: None,
            outcome: JobOutcome::NotRun,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self.outcome, JobOutcome::Extracted(_))
    }

    pub fn failure(&self) -> Option<(RepublishStage, &CascadeError)> {
        match &self.outcome {
            JobOutcome::Failed { stage, error } => Some((*stage, error)),
            _ => None,
        }
    }
}

/// Result of the extraction phase over all jobs
#[derive(Debug, Default)]
pub struct ExtractReport {
    pub jobs: Vec<JobReport>,
    /// Index of the job whose failure aborted the batch
    pub aborted_at: Option<usize>,
}

impl ExtractReport {
    /// Every job extracted
    pub fn is_complete(&self) -> bool {
        self.aborted_at.is_none() && self.jobs.iter().all(JobReport::is_extracted)
    }

    pub fn failed_jobs(&self) -> impl Iterator<Item = &JobReport> {
        self.jobs.iter().filter(|j| j.failure().is_some())
    }

    pub fn extracted_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_extracted()).count()
    }
}

/// A failed job left out of an otherwise successful batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedJob {
    pub index: usize,
    pub source: SourceLocator,
    pub stage: RepublishStage,
    pub error: String,
}

/// Contexts cleared for integration, in job order
#[derive(Debug)]
pub struct ExtractedBatch {
    contexts: Vec<(usize, PublishContext)>,
    skipped: Vec<SkippedJob>,
}

impl ExtractedBatch {
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn contexts(&self) -> impl Iterator<Item = (usize, &PublishContext)> {
        self.contexts.iter().map(|(i, c)| (*i, c))
    }

    /// Jobs that failed before extraction and are not part of the batch
    pub fn skipped(&self) -> &[SkippedJob] {
        &self.skipped
    }
}

impl TryFrom<ExtractReport> for ExtractedBatch {
    type Error = CascadeError;

    /// Jobs that failed before extraction started are left out; anything
    /// else short of a successful extraction rejects the whole batch.
    fn try_from(report: ExtractReport) -> CascadeResult<Self> {
        if let Some(index) = report.aborted_at {
            let reason = report
                .jobs
                .iter()
                .find(|j| j.index == index)
                .and_then(|j| j.failure())
                .map(|(stage, error)| format!("job {} failed during {}: {}", index + 1, stage, error))
                .unwrap_or_else(|| format!("job {} aborted the batch", index + 1));
            return Err(CascadeError::AtomicityNotHeld { reason });
        }

        let mut contexts = Vec::new();
        let mut skipped = Vec::new();
        for job in report.jobs {
            match job.outcome {
                JobOutcome::Extracted(context) if context.all_succeeded() => {
                    contexts.push((job.index, context));
                }
                JobOutcome::Extracted(_) => {
                    return Err(CascadeError::AtomicityNotHeld {
                        reason: format!("job {} reported failed results", job.index + 1),
                    });
                }
                JobOutcome::Failed { stage, error } if !aborts_batch(stage, &error) => {
                    skipped.push(SkippedJob {
                        index: job.index,
                        source: job.source,
                        stage,
                        error: error.to_string(),
                    });
                }
                JobOutcome::Failed { stage, error } => {
                    return Err(CascadeError::AtomicityNotHeld {
                        reason: format!(
                            "job {} failed during {}: {}",
                            job.index + 1,
                            stage,
                            error
                        ),
                    });
                }
                JobOutcome::NotRun => {
                    return Err(CascadeError::AtomicityNotHeld {
                        reason: format!("job {} never ran", job.index + 1),
                    });
                }
            }
        }

        Ok(Self { contexts, skipped })
    }
}

/// Whether a job failure stops the whole batch.
///
/// A host panic leaves the application in an unknown state, so it stops the
/// batch whatever stage it hit.
pub(super) fn aborts_batch(stage: RepublishStage, error: &CascadeError) -> bool {
    stage.aborts_batch() || matches!(error, CascadeError::Host { .. })
}

/// Result of the integration phase
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntegrationReport {
    /// Indices of integrated jobs, in integration order
    pub integrated: Vec<usize>,
    pub skipped: Vec<SkippedJob>,
}

impl IntegrationReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

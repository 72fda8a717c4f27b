//! Republish Event Port
//!
//! Observable progress of a worker run: planning, per-job stages and the
//! final integration. Enables log output, NDJSON streams and test probes.

use std::path::PathBuf;

use crate::domain::value_objects::RepublishStage;

/// Event emitted while republishing dependents
#[derive(Debug, Clone, PartialEq)]
pub enum RepublishEvent {
    /// Jobs were planned from the stale dependents
    Planned { job_count: usize, dependent_count: usize },

    /// A job entered a stage
    StageEntered {
        index: usize,
        source: PathBuf,
        stage: RepublishStage,
    },

    /// The retargeted scene was saved as a new revision
    Persisted { index: usize, revision: PathBuf },

    /// A job finished extraction and was added to the batch
    Extracted { index: usize, instance_count: usize },

    /// A job failed
    JobFailed {
        index: usize,
        stage: RepublishStage,
        error: String,
    },

    /// Integration of the batch started
    IntegrationStarted { context_count: usize },

    /// One batched context was integrated
    Integrated { index: usize },

    /// The run finished
    Completed {
        integrated_count: usize,
        failed_count: usize,
    },
}

/// Trait for receiving republish events
pub trait RepublishEventSink {
    fn on_event(&self, event: RepublishEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl RepublishEventSink for NoopEventSink {
    fn on_event(&self, _event: RepublishEvent) {}
}

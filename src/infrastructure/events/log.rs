//! Tracing Event Sink
//!
//! Turns republish events into log records, so a worker run without
//! `--json` still leaves a readable trail on stderr.

use crate::domain::ports::{RepublishEvent, RepublishEventSink};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl RepublishEventSink for TracingEventSink {
    fn on_event(&self, event: RepublishEvent) {
        match event {
            RepublishEvent::Planned {
                job_count,
                dependent_count,
            } => tracing::info!(jobs = job_count, dependents = dependent_count, "planned republish"),
            RepublishEvent::StageEntered {
                index,
                source,
                stage,
            } => tracing::info!(job = index + 1, source = %source.display(), "{}", stage),
            RepublishEvent::Persisted { index, revision } => {
                tracing::info!(job = index + 1, revision = %revision.display(), "saved revision")
            }
            RepublishEvent::Extracted {
                index,
                instance_count,
            } => tracing::info!(job = index + 1, instances = instance_count, "extracted"),
            RepublishEvent::JobFailed {
                index,
                stage,
                error,
            } => tracing::error!(job = index + 1, %stage, "{}", error),
            RepublishEvent::IntegrationStarted { context_count } => {
                tracing::info!(contexts = context_count, "integrating batch")
            }
            RepublishEvent::Integrated { index } => tracing::info!(job = index + 1, "integrated"),
            RepublishEvent::Completed {
                integrated_count,
                failed_count,
            } => tracing::info!(
                integrated = integrated_count,
                failed = failed_count,
                "republish finished"
            ),
        }
    }
}

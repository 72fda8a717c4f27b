//! JSON Event Sink
//!
//! Outputs republish events as NDJSON for automation consumption.

use crate::domain::ports::{RepublishEvent, RepublishEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl RepublishEventSink for JsonEventSink {
    fn on_event(&self, event: RepublishEvent) {
        let json = match event {
            RepublishEvent::Planned {
                job_count,
                dependent_count,
            } => {
                serde_json::json!({
                    "event": "planned",
                    "command": "worker",
                    "jobs": job_count,
                    "dependents": dependent_count,
                })
            }

            RepublishEvent::StageEntered {
                index,
                source,
                stage,
            } => {
                serde_json::json!({
                    "event": "stage",
                    "command": "worker",
                    "index": index,
                    "source": source.display().to_string(),
                    "stage": stage,
                })
            }

            RepublishEvent::Persisted { index, revision } => {
                serde_json::json!({
                    "event": "persisted",
                    "command": "worker",
                    "index": index,
                    "revision": revision.display().to_string(),
                })
            }

            RepublishEvent::Extracted {
                index,
                instance_count,
            } => {
                serde_json::json!({
                    "event": "extracted",
                    "command": "worker",
                    "index": index,
                    "instances": instance_count,
                })
            }

            RepublishEvent::JobFailed {
                index,
                stage,
                error,
            } => {
                serde_json::json!({
                    "event": "job_failed",
                    "command": "worker",
                    "index": index,
                    "stage": stage,
                    "error": error,
                })
            }

            RepublishEvent::IntegrationStarted { context_count } => {
                serde_json::json!({
                    "event": "integrating",
                    "command": "worker",
                    "contexts": context_count,
                })
            }

            RepublishEvent::Integrated { index } => {
                serde_json::json!({
                    "event": "integrated",
                    "command": "worker",
                    "index": index,
                })
            }

            RepublishEvent::Completed {
                integrated_count,
                failed_count,
            } => {
                let status = match (integrated_count, failed_count) {
                    (_, 0) => "success",
                    (0, _) => "failed",
                    _ => "partial",
                };
                serde_json::json!({
                    "event": "complete",
                    "command": "worker",
                    "status": status,
                    "integrated": integrated_count,
                    "failed": failed_count,
                })
            }
        };

        self.write_event(json);
    }
}

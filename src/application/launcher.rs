//! Worker Launcher
//!
//! Hands a job descriptor to an isolated worker process and blocks until it
//! exits. A failed worker never rolls back the triggering publish; instead
//! the triggering version is annotated so the failure can be followed up.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::domain::entities::{JobDescriptor, Patch, FAILURE_FLAG_KEY};
use crate::domain::ports::{AssetDatabase, ProcessSpawner};
use crate::domain::value_objects::VersionId;

/// Shown to the publisher when the automated update did not go through
pub const FOLLOW_UP_MESSAGE: &str =
    "Model publish succeeded but rig auto update failed. Please inform a rigger or TD.";

/// Result of one worker launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Completed,
    Failed {
        message: String,
        /// Last stderr line of the worker, or the spawn error
        diagnostic: Option<String>,
        /// Whether the failure annotation was written
        flagged: bool,
    },
}

impl LaunchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, LaunchOutcome::Completed)
    }
}

pub struct WorkerLauncher<S: ProcessSpawner> {
    spawner: S,
    executable: PathBuf,
    extra_args: Vec<String>,
}

impl<S: ProcessSpawner> WorkerLauncher<S> {
    pub fn new(spawner: S, executable: impl Into<PathBuf>) -> Self {
        Self {
            spawner,
            executable: executable.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments placed before the `worker` subcommand, e.g. `--config <path>`
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Full worker argument list for `payload`
    pub fn worker_args(&self, payload: String) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.push("worker".to_string());
        args.push("--payload".to_string());
        args.push(payload);
        args
    }

    /// Run the worker for `descriptor`; on failure annotate `trigger`.
    pub fn launch<D: AssetDatabase + ?Sized>(
        &self,
        db: &D,
        trigger: &VersionId,
        descriptor: &JobDescriptor,
    ) -> LaunchOutcome {
        let diagnostic = match self.run_worker(descriptor) {
            Ok(()) => {
                tracing::info!(
                    asset = %descriptor.asset_name,
                    dependents = descriptor.dependents.len(),
                    "worker finished"
                );
                return LaunchOutcome::Completed;
            }
            Err(diagnostic) => diagnostic,
        };

        tracing::error!(
            asset = %descriptor.asset_name,
            version = %trigger,
            %diagnostic,
            "worker failed"
        );

        let patch = Patch::new().set(format!("data.{}", FAILURE_FLAG_KEY), json!(true));
        let flagged = match db.update(trigger, &patch) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(version = %trigger, error = %err, "could not flag version for follow-up");
                false
            }
        };

        LaunchOutcome::Failed {
            message: FOLLOW_UP_MESSAGE.to_string(),
            diagnostic: Some(diagnostic),
            flagged,
        }
    }

    fn run_worker(&self, descriptor: &JobDescriptor) -> Result<(), String> {
        let payload = descriptor.to_json().map_err(|e| e.to_string())?;
        let args = self.worker_args(payload);

        tracing::debug!(program = %self.executable.display(), "launching worker");
        let output = self
            .spawner
            .run(&self.executable, &args)
            .map_err(|e| e.to_string())?;

        if output.success() {
            return Ok(());
        }
        let code = output
            .code
            .map_or_else(|| "a signal".to_string(), |c| format!("code {}", c));
        Err(match output.diagnostic() {
            Some(line) => format!("worker exited with {}: {}", code, line),
            None => format!("worker exited with {}", code),
        })
    }
}

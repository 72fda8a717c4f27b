//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::{AutoUpdateUseCase, WorkerLauncher, WorkerUseCase};
use crate::config::Config;
use crate::domain::ports::RepublishEventSink;
use crate::error::CascadeResult;
use crate::infrastructure::{
    CommandSpawner, JsonDocumentStore, JsonEventSink, ManifestPipeline, ManifestSceneHost,
    TracingEventSink,
};

/// Type alias for the concrete AutoUpdateUseCase with all dependencies
pub type ConcreteTriggerUseCase = AutoUpdateUseCase<JsonDocumentStore, CommandSpawner>;

/// Type alias for the concrete WorkerUseCase with all dependencies
pub type ConcreteWorkerUseCase = WorkerUseCase<
    Arc<JsonDocumentStore>,
    ManifestSceneHost,
    ManifestPipeline<Arc<JsonDocumentStore>, CommandSpawner>,
>;

/// Create the trigger use case.
///
/// `config_source` is forwarded to the worker as `--config` so both
/// processes resolve the same settings.
pub fn create_trigger_use_case(
    config: &Config,
    config_source: Option<&Path>,
) -> CascadeResult<ConcreteTriggerUseCase> {
    let db = JsonDocumentStore::open(config.database_path());
    let launcher = WorkerLauncher::new(CommandSpawner::new(), worker_executable(config)?)
        .with_extra_args(worker_args(config, config_source));

    Ok(AutoUpdateUseCase::new(db, launcher))
}

/// Create the worker use case
pub fn create_worker_use_case(config: &Config) -> ConcreteWorkerUseCase {
    let db = Arc::new(JsonDocumentStore::open(config.database_path()));

    let mut pipeline = ManifestPipeline::new(
        Arc::clone(&db),
        CommandSpawner::new().with_current_dir(config.project.root.clone()),
        config.project.root.clone(),
    )
    .with_extract_command(config.pipeline.extract_command.clone());
    if let Some(dir) = config.staging_dir() {
        pipeline = pipeline.with_staging_dir(dir);
    }
    if let Some(dir) = config.publish_root() {
        pipeline = pipeline.with_publish_root(dir);
    }

    WorkerUseCase::new(db, ManifestSceneHost::new(), pipeline)
}

/// Event sink for a worker run
pub fn create_event_sink(json: bool) -> Arc<dyn RepublishEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(TracingEventSink)
    }
}

fn worker_executable(config: &Config) -> CascadeResult<PathBuf> {
    match &config.worker.executable {
        Some(path) => Ok(path.clone()),
        None => Ok(std::env::current_exe()?),
    }
}

fn worker_args(config: &Config, config_source: Option<&Path>) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(source) = config_source {
        let source = source.canonicalize().unwrap_or_else(|_| source.to_path_buf());
        args.push("--config".to_string());
        args.push(source.display().to_string());
    }
    args.extend(config.worker.extra_args.iter().cloned());
    args
}

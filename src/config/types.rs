//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::republish::{RepublishSettings, DEFAULT_COMMENT, DEFAULT_TASK};
use crate::application::trigger::TriggerOptions;
use crate::application::worker::WorkerOptions;
use crate::domain::policies::INSTANCE_ID_REPAIR;
use crate::domain::services::DEFAULT_DEPENDENT_PREFIX;
use crate::domain::value_objects::DEFAULT_REVISION_DIR;
use crate::error::CascadeResult;

use super::loader::{self, ConfigWarning, LoadedConfig};

/// Where the project lives and which document store backs it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// JSON document store, relative paths resolve against `root`
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            database: default_database(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_database() -> PathBuf {
    PathBuf::from("assets.json")
}

/// Publisher-side settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Only subsets starting with this prefix count as dependents
    #[serde(default = "default_subset_prefix")]
    pub subset_prefix: String,

    #[serde(default = "default_task")]
    pub task: String,

    /// Require the asset's per-task `autoModelUpdate` option to be on
    #[serde(default = "default_true")]
    pub require_task_option: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            subset_prefix: default_subset_prefix(),
            task: default_task(),
            require_task_option: true,
        }
    }
}

fn default_subset_prefix() -> String {
    DEFAULT_DEPENDENT_PREFIX.to_string()
}

fn default_task() -> String {
    DEFAULT_TASK.to_string()
}

fn default_true() -> bool {
    true
}

/// How the worker process is launched
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkerConfig {
    /// Defaults to the running executable
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Arguments placed before `worker --payload <json>`
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Worker-side republish pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_comment")]
    pub comment: String,

    /// Repair capability ids run against collected instances
    #[serde(default = "default_repairs")]
    pub repairs: Vec<String>,

    #[serde(default)]
    pub staging_dir: Option<PathBuf>,

    #[serde(default)]
    pub publish_root: Option<PathBuf>,

    /// Optional external exporter; empty means artifacts are written directly
    #[serde(default)]
    pub extract_command: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            comment: default_comment(),
            repairs: default_repairs(),
            staging_dir: None,
            publish_root: None,
            extract_command: Vec::new(),
        }
    }
}

fn default_comment() -> String {
    DEFAULT_COMMENT.to_string()
}

fn default_repairs() -> Vec<String> {
    vec![INSTANCE_ID_REPAIR.to_string()]
}

/// Auto-update revision naming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionConfig {
    /// Directory created next to the source scene
    #[serde(default = "default_revision_dir")]
    pub directory: String,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            directory: default_revision_dir(),
        }
    }
}

fn default_revision_dir() -> String {
    DEFAULT_REVISION_DIR.to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub revision: RevisionConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> CascadeResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> CascadeResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Resolve the config file to use and apply environment overrides
    pub fn discover(explicit: Option<&Path>) -> CascadeResult<LoadedConfig> {
        loader::discover(explicit)
    }

    /// Apply environment variable overrides (RIGCASCADE_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// Database path, resolved against the project root when relative
    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.project.database)
    }

    pub fn staging_dir(&self) -> Option<PathBuf> {
        self.pipeline.staging_dir.as_deref().map(|p| self.resolve(p))
    }

    pub fn publish_root(&self) -> Option<PathBuf> {
        self.pipeline.publish_root.as_deref().map(|p| self.resolve(p))
    }

    /// Trigger options for one published subset
    pub fn trigger_options(&self, asset: &str, subset: &str) -> TriggerOptions {
        TriggerOptions::new(asset, subset)
            .with_dependent_prefix(self.trigger.subset_prefix.clone())
            .with_task(self.trigger.task.clone())
            .with_require_task_option(self.trigger.require_task_option)
    }

    pub fn republish_settings(&self) -> RepublishSettings {
        RepublishSettings::default()
            .with_task(self.trigger.task.clone())
            .with_comment(self.pipeline.comment.clone())
            .with_revision_dir(self.revision.directory.clone())
    }

    pub fn worker_options(&self) -> WorkerOptions {
        WorkerOptions::new(self.project.root.clone())
            .with_republish(self.republish_settings())
            .with_repairs(self.pipeline.repairs.clone())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project.root.join(path)
        }
    }
}

//! Configuration module for rigcascade
//!
//! Resolution order (first match wins):
//! 1. Explicit `--config <path>`
//! 2. Project config (`./rigcascade.toml`)
//! 3. User config (`<config_dir>/rigcascade/config.toml`)
//! 4. Built-in defaults
//!
//! `RIGCASCADE_*` environment variables are applied on top of whichever
//! file was loaded.

mod loader;
mod types;

pub use loader::{ConfigWarning, LoadedConfig, PROJECT_CONFIG_FILE};
pub use types::{
    Config, PipelineConfig, ProjectConfig, RevisionConfig, TriggerConfig, WorkerConfig,
};

//! rigcascade - dependency-triggered republishing
//!
//! When a new version of a base subset (a model) is published, rigcascade
//! finds the dependent subsets (rigs) whose latest version was built
//! against an older base version, and republishes them against the new one
//! in a separate worker process. Either every dependent extracts cleanly
//! and the whole batch is integrated, or nothing is, and the triggering
//! version is flagged for follow-up.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    AutoUpdateUseCase, TriggerOptions, TriggerOutcome, WorkerLauncher, WorkerOptions,
    WorkerReport, WorkerUseCase,
};
pub use config::Config;
pub use domain::entities::{JobDescriptor, StaleDependents};
pub use error::{CascadeError, CascadeResult};

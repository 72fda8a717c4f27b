//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `AutoUpdateUseCase` - Runs after a base publish: gate, staleness, worker launch
//! - `WorkerUseCase` - The worker process: plan, extract every job, integrate the batch
//!
//! ## Services
//!
//! - `WorkerLauncher` - Spawns the worker and flags the trigger on failure
//! - `StagedRepublish` - Two-phase extract/integrate driver over one scene session

pub mod launcher;
pub mod republish;
pub mod trigger;
pub mod worker;

pub use launcher::{LaunchOutcome, WorkerLauncher, FOLLOW_UP_MESSAGE};
pub use republish::{
    ExtractReport, ExtractedBatch, IntegrationReport, RepublishSettings, RepublishTarget,
    SceneSession, StagedRepublish,
};
pub use trigger::{AutoUpdateUseCase, TriggerOptions, TriggerOutcome};
pub use worker::{WorkerOptions, WorkerReport, WorkerUseCase};

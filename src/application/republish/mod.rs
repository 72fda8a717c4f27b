//! Republish Module
//!
//! Drives the batch of republish jobs inside the worker.
//!
//! ## Structure
//!
//! - `options` - Batch inputs (`RepublishTarget`, `RepublishSettings`)
//! - `report` - Phase results (`ExtractReport`, `ExtractedBatch`, `IntegrationReport`)
//! - `session` - Exclusive scene session (`SceneSession`, `OpenScene`)
//! - `staged` - The two-phase driver (`StagedRepublish`)
//!
//! ## Usage
//!
//! ```ignore
//! use rigcascade::application::republish::{ExtractedBatch, StagedRepublish};
//!
//! let mut staged = StagedRepublish::new(host, pipeline, settings);
//! let report = staged.extract_all(&target, &jobs);
//! let batch = ExtractedBatch::try_from(report)?;
//! staged.integrate_all(batch)?;
//! ```

mod options;
mod report;
mod session;
mod staged;

pub use options::{RepublishSettings, RepublishTarget, DEFAULT_COMMENT, DEFAULT_TASK};
pub use report::{
    ExtractReport, ExtractedBatch, IntegrationReport, JobOutcome, JobReport, SkippedJob,
};
pub use session::{OpenScene, SceneSession};
pub use staged::StagedRepublish;
